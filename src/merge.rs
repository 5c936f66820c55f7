//! Selective partial-update merge.
//!
//! A partial model is a struct shaped like an entity whose fields are all
//! optional. [`merge_fields!`] declares which of its fields correspond, by
//! name, to fields of a given entity; [`MergeEngine::apply`] then copies every
//! field that is set onto the entity and leaves the rest alone.
//!
//! ```ignore
//! merge_fields!(ProductPatch => Product { title, price, description });
//!
//! let mut product = load(id).await?;
//! MergeEngine::default().apply(&patch, &mut product);
//! ```
//!
//! A field counts as set when [`FieldPresence::present`] yields a value:
//! `Some(_)` for `Option` fields, and for plain value fields anything but the
//! zero value unless the engine runs with [`ZeroPolicy::Write`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a non-nullable partial field holding its zero value is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    /// Zero means the client did not send the field.
    #[default]
    Skip,
    /// Zero is a real value and overwrites the target.
    Write,
}

impl FromStr for ZeroPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(ZeroPolicy::Skip),
            "write" => Ok(ZeroPolicy::Write),
            other => Err(format!("unknown zero policy: {other}")),
        }
    }
}

/// Is-set predicate for one partial-model field.
pub trait FieldPresence {
    type Value: Clone;

    /// The value to write, or `None` when the field is unset.
    fn present(&self, policy: ZeroPolicy) -> Option<&Self::Value>;
}

impl<T: Clone> FieldPresence for Option<T> {
    type Value = T;

    fn present(&self, _policy: ZeroPolicy) -> Option<&T> {
        self.as_ref()
    }
}

macro_rules! zero_valued_presence {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl FieldPresence for $ty {
                type Value = $ty;

                fn present(&self, policy: ZeroPolicy) -> Option<&$ty> {
                    match policy {
                        ZeroPolicy::Skip if *self == $zero => None,
                        _ => Some(self),
                    }
                }
            }
        )*
    };
}

zero_valued_presence!(
    u8 => 0,
    u16 => 0,
    u32 => 0,
    u64 => 0,
    i32 => 0,
    i64 => 0,
    f64 => 0.0,
    bool => false,
    String => "",
);

/// Writes `source` into `slot` when it is set. The value converts with
/// `Into`, so an `Option<T>` partial field fills either a `T` or an
/// `Option<T>` entity field.
pub fn merge_slot<V, S>(source: &V, slot: &mut S, policy: ZeroPolicy) -> bool
where
    V: FieldPresence,
    V::Value: Into<S>,
{
    match source.present(policy) {
        Some(value) => {
            *slot = value.clone().into();
            true
        }
        None => false,
    }
}

/// One mergeable field shared by a partial model `P` and an entity `E`.
pub struct MergeField<P, E> {
    pub name: &'static str,
    pub apply: fn(&P, &mut E, ZeroPolicy) -> bool,
}

impl<P, E> fmt::Debug for MergeField<P, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeField").field("name", &self.name).finish()
    }
}

/// A partial update model that can be merged onto `E`.
///
/// Implemented through [`merge_fields!`]; a model may implement it for as
/// many entities as it shares fields with.
pub trait PartialModel<E: 'static>: Sized + 'static {
    const FIELDS: &'static [MergeField<Self, E>];
}

/// Names of the fields a merge actually wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub applied: Vec<&'static str>,
}

impl MergeReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeEngine {
    zero_policy: ZeroPolicy,
}

impl MergeEngine {
    pub fn new(zero_policy: ZeroPolicy) -> Self {
        Self { zero_policy }
    }

    pub fn zero_policy(&self) -> ZeroPolicy {
        self.zero_policy
    }

    /// Applies every set field of `partial` onto `target` in place.
    pub fn apply<'a, P, E>(&self, partial: &P, target: &'a mut E) -> &'a mut E
    where
        P: PartialModel<E>,
        E: 'static,
    {
        self.apply_with_report(partial, target);
        target
    }

    pub fn apply_with_report<P, E>(&self, partial: &P, target: &mut E) -> MergeReport
    where
        P: PartialModel<E>,
        E: 'static,
    {
        let applied = P::FIELDS
            .iter()
            .filter(|field| (field.apply)(partial, target, self.zero_policy))
            .map(|field| field.name)
            .collect();
        MergeReport { applied }
    }
}

/// [`MergeEngine::apply`] with the default zero policy.
pub fn apply<'a, P, E>(partial: &P, target: &'a mut E) -> &'a mut E
where
    P: PartialModel<E>,
    E: 'static,
{
    MergeEngine::default().apply(partial, target)
}

/// Declares the fields a partial model shares with an entity.
///
/// Field names must exist on both types; fields the partial model carries but
/// does not list here are never touched.
#[macro_export]
macro_rules! merge_fields {
    ($partial:ty => $entity:ty { $($field:ident),* $(,)? }) => {
        impl $crate::merge::PartialModel<$entity> for $partial {
            const FIELDS: &'static [$crate::merge::MergeField<Self, $entity>] = &[
                $(
                    $crate::merge::MergeField {
                        name: stringify!($field),
                        apply: {
                            fn apply(
                                partial: &$partial,
                                target: &mut $entity,
                                policy: $crate::merge::ZeroPolicy,
                            ) -> bool {
                                $crate::merge::merge_slot(&partial.$field, &mut target.$field, policy)
                            }
                            apply
                        },
                    },
                )*
            ];
        }
    };
}
