//! Compile time dependency injection.
//!
//! A [`Provider`] owns the leaf dependencies of the application (external
//! connections and configuration). Everything else implements [`Build`],
//! usually via `#[derive(Build)]`, and is assembled recursively from the
//! provider. Built values are cached per provider, so every service is
//! constructed at most once and shared by all of its dependents.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

pub use portfolio_di_derive::Build;

// Lets `#[derive(Build)]` refer to `::portfolio_di` from within this crate.
extern crate self as portfolio_di;

mod macros;

pub trait Provider: Sized {
    /// Cache of values that have already been built by this provider.
    fn cache(&mut self) -> &mut TypeMap;
}

#[diagnostic::on_unimplemented(
    message = "The type `{Self}` cannot be built using the provider `{P}`",
    note = "Add `{Self}` to the provider `{P}` or implement `Build` for `{Self}` and make sure \
            all dependencies are satisfied"
)]
pub trait Build<P: Provider>: Clone + 'static {
    fn build(provider: &mut P) -> Self;
}

pub trait Provide: Provider {
    fn provide<T: Build<Self>>(&mut self) -> T {
        T::build(self)
    }
}

impl<P: Provider> Provide for P {}

/// A map holding at most one value per type.
#[derive(Debug, Default)]
pub struct TypeMap(HashMap<TypeId, Box<dyn Any>>);

impl TypeMap {
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.0
            .get(&TypeId::of::<T>())
            .and_then(|x| x.downcast_ref())
    }

    pub fn insert<T: 'static>(&mut self, x: T) {
        self.0.insert(TypeId::of::<T>(), Box::new(x));
    }
}
