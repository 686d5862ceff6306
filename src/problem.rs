//! Recoverable findings and the policy deciding their severity.
//!
//! Type mapping and name validation can run into situations that are not
//! hard failures: a type that only has an approximate representation, an
//! identifier over the length limit, a server encoding we do not know.
//! These are captured as [`Problem`]s in a [`Problems`] collector threaded
//! through the fallible calls, and [`ProblemBehavior`] decides at the call
//! site whether a problem is dropped, collected or escalated to an error.

use crate::error::{Error, ErrorKind};
use std::fmt;

/// A non-fatal finding produced during type mapping or name validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// The requested type has no exact representation in the target
    /// database. Generation continues with the closest supported type.
    InexactTypeCoercion { requested: String, used: String },

    /// The database reported a name encoding the naming rules do not
    /// know. Length checks continue assuming UTF-8.
    UnsupportedNameEncoding { encoding: String },

    /// An entity name exceeds the identifier length limit of the dialect.
    NameTooLong {
        name: String,
        length: usize,
        limit: usize,
    },
}

impl Problem {
    /// The error form of the problem. Encoding problems stay warnings
    /// under every behavior and therefore have none.
    fn as_error(&self) -> Option<ErrorKind> {
        match self {
            Self::InexactTypeCoercion { requested, used } => Some(ErrorKind::InexactTypeCoercion {
                requested: requested.clone(),
                used: used.clone(),
            }),
            Self::NameTooLong { name, length, limit } => Some(ErrorKind::NameTooLong {
                name: name.clone(),
                length: *length,
                limit: *limit,
            }),
            Self::UnsupportedNameEncoding { .. } => None,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InexactTypeCoercion { requested, used } => {
                write!(
                    f,
                    "The type {requested} has no exact representation, the closest match is {used}"
                )
            }
            Self::UnsupportedNameEncoding { encoding } => {
                write!(
                    f,
                    "The database reported the unknown encoding '{encoding}', assuming UTF-8 for identifier length checks"
                )
            }
            Self::NameTooLong { name, length, limit } => {
                write!(f, "The name '{name}' is too long: {length} where the limit is {limit}")
            }
        }
    }
}

/// A push-only collector for [`Problem`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Problems(Vec<Problem>);

impl Problems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, problem: Problem) {
        self.0.push(problem);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Problem> {
        self.0
    }
}

impl Extend<Problem> for Problems {
    fn extend<T: IntoIterator<Item = Problem>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Problems {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Problems {
    type Item = Problem;
    type IntoIter = std::vec::IntoIter<Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// How a [`Problem`] is treated at the site producing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProblemBehavior {
    /// Drop the problem.
    Ignore,
    /// Collect the problem and continue.
    #[default]
    ReportWarning,
    /// Fail with the corresponding error.
    ReportError,
}

impl ProblemBehavior {
    /// Applies the policy to one problem. Every site producing a problem
    /// funnels through here, so the severity rules live in one place.
    pub fn report(self, problem: Problem, problems: &mut Problems) -> crate::Result<()> {
        match self {
            Self::Ignore => Ok(()),
            Self::ReportWarning => {
                problems.push(problem);
                Ok(())
            }
            Self::ReportError => match problem.as_error() {
                Some(kind) => Err(Error::from(kind)),
                // Warning-only problems are collected even when the
                // caller asked for errors.
                None => {
                    problems.push(problem);
                    Ok(())
                }
            },
        }
    }
}
