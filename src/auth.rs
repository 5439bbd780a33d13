//! # Actor Resolution
//!
//! The authentication subsystem is external; transitions only need to know
//! who is acting. Callers pass an [`ActorResolver`] explicitly instead of the
//! core reaching into an ambient session.

use crate::query_builder::BindValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of an authenticated actor, as stored in moderated-by
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActorId {
    Int(i64),
    Uuid(Uuid),
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorId::Int(id) => write!(f, "{id}"),
            ActorId::Uuid(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for ActorId {
    fn from(id: i64) -> Self {
        ActorId::Int(id)
    }
}

impl From<Uuid> for ActorId {
    fn from(id: Uuid) -> Self {
        ActorId::Uuid(id)
    }
}

impl From<ActorId> for BindValue {
    fn from(id: ActorId) -> Self {
        match id {
            ActorId::Int(id) => BindValue::Int(id),
            ActorId::Uuid(id) => BindValue::Uuid(id),
        }
    }
}

/// Supplies the current actor, or `None` when nobody is authenticated
pub trait ActorResolver: Send + Sync {
    fn current_actor(&self) -> Option<ActorId>;
}

/// Fixed actor for the duration of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentActor(Option<ActorId>);

impl CurrentActor {
    pub fn authenticated(id: impl Into<ActorId>) -> Self {
        Self(Some(id.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl ActorResolver for CurrentActor {
    fn current_actor(&self) -> Option<ActorId> {
        self.0.clone()
    }
}

impl<F> ActorResolver for F
where
    F: Fn() -> Option<ActorId> + Send + Sync,
{
    fn current_actor(&self) -> Option<ActorId> {
        self()
    }
}
