//! Entities: records with a stable identity that are stored but never evolve
//! through events (orders, for instance).

use core::fmt::{Debug, Display};
use core::hash::Hash;

pub trait Entity {
    type Id: Clone + Eq + Hash + Debug + Display;

    fn id(&self) -> &Self::Id;

    /// Storage and envelope key: the identifier's display form.
    fn key(&self) -> String {
        self.id().to_string()
    }
}
