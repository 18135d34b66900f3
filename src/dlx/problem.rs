#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Validated description of an exact cover instance.
//!
//! An [`ExactCover`] holds the requirement universe (mandatory requirements first, then
//! optional ones) and the actions, each mapped to the requirements it satisfies. All
//! configuration errors are caught here, so building the matrix and searching it never
//! fails.

use crate::dlx::error::DlxError;
use crate::dlx::matrix::Matrix;
use crate::dlx::solver::Dlx;
use bit_vec::BitVec;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;

/// Column indices of one action.
pub type RowColumns = SmallVec<[usize; 8]>;

/// Requirements and actions of an exact cover problem.
///
/// # Example
///
/// ```
/// use dlx_solver::dlx::ExactCover;
///
/// let mut problem = ExactCover::new(1..=3, []).unwrap();
/// problem.add_action('a', [1, 2]).unwrap();
/// problem.add_action('b', [3]).unwrap();
/// problem.add_action('c', [2, 3]).unwrap();
///
/// let result = problem.solver().solve(&mut ());
/// assert_eq!(result.solutions, vec![vec!['a', 'b']]);
/// ```
#[derive(Debug, Clone)]
pub struct ExactCover<R, A> {
    requirements: Vec<R>,
    mandatory: usize,
    requirement_index: FxHashMap<R, usize>,
    actions: Vec<A>,
    action_index: FxHashMap<A, usize>,
    rows: Vec<RowColumns>,
}

impl<R, A> ExactCover<R, A>
where
    R: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Declares the requirement universe.
    ///
    /// # Errors
    ///
    /// [`DlxError::DuplicateRequirement`] if a requirement appears twice, including once
    /// in each list.
    pub fn new<M, O>(mandatory: M, optional: O) -> Result<Self, DlxError>
    where
        M: IntoIterator<Item = R>,
        O: IntoIterator<Item = R>,
    {
        let mut problem = Self {
            requirements: Vec::new(),
            mandatory: 0,
            requirement_index: FxHashMap::default(),
            actions: Vec::new(),
            action_index: FxHashMap::default(),
            rows: Vec::new(),
        };

        for requirement in mandatory {
            problem.declare(requirement)?;
        }
        problem.mandatory = problem.requirements.len();
        for requirement in optional {
            problem.declare(requirement)?;
        }

        Ok(problem)
    }

    /// Builds a problem in one go from requirement lists and an action table.
    ///
    /// # Errors
    ///
    /// Any error [`Self::new`] or [`Self::add_action`] can return.
    pub fn from_parts<M, O, T, S>(mandatory: M, actions: T, optional: O) -> Result<Self, DlxError>
    where
        M: IntoIterator<Item = R>,
        O: IntoIterator<Item = R>,
        T: IntoIterator<Item = (A, S)>,
        S: IntoIterator<Item = R>,
    {
        let mut problem = Self::new(mandatory, optional)?;
        for (action, satisfies) in actions {
            problem.add_action(action, satisfies)?;
        }
        Ok(problem)
    }

    /// Adds an action satisfying the given requirements.
    ///
    /// # Errors
    ///
    /// - [`DlxError::DuplicateAction`] if the action was already added.
    /// - [`DlxError::EmptyAction`] if `satisfies` is empty.
    /// - [`DlxError::UnknownRequirement`] if a requirement was never declared.
    /// - [`DlxError::RepeatedRequirement`] if a requirement is listed twice.
    ///
    /// On error the problem is left unchanged.
    pub fn add_action<S>(&mut self, action: A, satisfies: S) -> Result<&mut Self, DlxError>
    where
        S: IntoIterator<Item = R>,
    {
        if self.action_index.contains_key(&action) {
            return Err(DlxError::DuplicateAction(format!("{action:?}")));
        }

        let mut columns = RowColumns::new();
        for requirement in satisfies {
            let Some(&column) = self.requirement_index.get(&requirement) else {
                return Err(DlxError::UnknownRequirement {
                    action: format!("{action:?}"),
                    requirement: format!("{requirement:?}"),
                });
            };
            if columns.contains(&column) {
                return Err(DlxError::RepeatedRequirement {
                    action: format!("{action:?}"),
                    requirement: format!("{requirement:?}"),
                });
            }
            columns.push(column);
        }

        if columns.is_empty() {
            return Err(DlxError::EmptyAction(format!("{action:?}")));
        }

        self.action_index.insert(action.clone(), self.actions.len());
        self.actions.push(action);
        self.rows.push(columns);
        Ok(self)
    }

    /// Mandatory requirements, in declaration order.
    #[must_use]
    pub fn mandatory(&self) -> &[R] {
        &self.requirements[..self.mandatory]
    }

    /// Optional requirements, in declaration order.
    #[must_use]
    pub fn optional(&self) -> &[R] {
        &self.requirements[self.mandatory..]
    }

    /// Actions, in declaration order.
    #[must_use]
    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// Whether `requirement` was declared as mandatory.
    #[must_use]
    pub fn is_mandatory(&self, requirement: &R) -> bool {
        self.requirement_index
            .get(requirement)
            .is_some_and(|&column| column < self.mandatory)
    }

    /// The requirements an action satisfies, or `None` for an unknown action.
    #[must_use]
    pub fn satisfied_by(&self, action: &A) -> Option<Vec<&R>> {
        let &row = self.action_index.get(action)?;
        Some(
            self.rows[row]
                .iter()
                .map(|&column| &self.requirements[column])
                .collect(),
        )
    }

    /// Total number of (action, requirement) incidences.
    #[must_use]
    pub fn incidence_count(&self) -> usize {
        self.rows.iter().map(SmallVec::len).sum()
    }

    /// Builds the incidence matrix for this problem.
    #[must_use]
    pub fn matrix(&self) -> Matrix {
        Matrix::new(self.requirements.len(), self.mandatory, &self.rows)
    }

    /// Builds a fresh search engine over a copy of this problem.
    #[must_use]
    pub fn solver(&self) -> Dlx<R, A> {
        Dlx::new(self.matrix(), self.requirements.clone(), self.actions.clone())
    }

    /// Builds a search engine, consuming the problem.
    #[must_use]
    pub fn into_solver(self) -> Dlx<R, A> {
        let matrix = self.matrix();
        Dlx::new(matrix, self.requirements, self.actions)
    }

    /// Checks that `solution` is an exact cover: every action is known, every mandatory
    /// requirement is satisfied exactly once and no optional requirement more than once.
    #[must_use]
    pub fn verify(&self, solution: &[A]) -> bool {
        let mut covered = BitVec::from_elem(self.requirements.len(), false);

        for action in solution {
            let Some(&row) = self.action_index.get(action) else {
                return false;
            };
            for &column in &self.rows[row] {
                if covered[column] {
                    return false;
                }
                covered.set(column, true);
            }
        }

        (0..self.mandatory).all(|column| covered[column])
    }

    fn declare(&mut self, requirement: R) -> Result<(), DlxError> {
        if self.requirement_index.contains_key(&requirement) {
            return Err(DlxError::DuplicateRequirement(format!("{requirement:?}")));
        }
        self.requirement_index
            .insert(requirement.clone(), self.requirements.len());
        self.requirements.push(requirement);
        Ok(())
    }
}
