use crate::{
    config::ConfigError, directive::UnknownVerb, model::CatalogError, traits::HostError,
    translate::TranslateError,
};
use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level aggregate over every failure surface of the engine, for hosts
/// that want a single error type at their call boundary. Internal code keeps
/// returning the specific enums.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Verb(#[from] UnknownVerb),
}

///
/// TESTS
///
