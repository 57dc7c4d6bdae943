//! Substance reference data.
//!
//! The core never reaches for a global table: every computation takes a
//! [`SubstanceRepository`] and only reads from it.

mod route;
mod table;

pub use route::AdministrationRoute;
pub use table::{Roa, Substance, SubstanceTable};

use crate::range::{RoaDose, RoaDuration};

/// Read-only lookup of per-route duration and dose tables.
pub trait SubstanceRepository {
    fn roa_duration(
        &self,
        substance_name: &str,
        route: AdministrationRoute,
    ) -> Option<&RoaDuration>;

    fn roa_dose(&self, substance_name: &str, route: AdministrationRoute) -> Option<&RoaDose>;
}

impl<T: SubstanceRepository + ?Sized> SubstanceRepository for &T {
    fn roa_duration(
        &self,
        substance_name: &str,
        route: AdministrationRoute,
    ) -> Option<&RoaDuration> {
        (**self).roa_duration(substance_name, route)
    }

    fn roa_dose(&self, substance_name: &str, route: AdministrationRoute) -> Option<&RoaDose> {
        (**self).roa_dose(substance_name, route)
    }
}
