//! Board projections: everything one dashboard screen renders, derived from
//! the current snapshot and identity in one go.

use super::tasks::{active_load, active_task, TaskFilter, TaskStats};
use crate::auth::Identity;
use crate::domain::{StaffMember, Task};

/// A staff listing row with its in-flight workload
#[derive(Debug, Clone, PartialEq)]
pub struct StaffRow<'a> {
    pub member: &'a StaffMember,
    pub active_load: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminBoard<'a> {
    pub filter: TaskFilter,
    /// Filtered tasks, snapshot order
    pub tasks: Vec<&'a Task>,
    /// Counters over the whole snapshot, not the filtered view
    pub stats: TaskStats,
    pub staff: Vec<StaffRow<'a>>,
}

impl<'a> AdminBoard<'a> {
    pub fn build(tasks: &'a [Task], staff: &'a [StaffMember], filter: TaskFilter) -> Self {
        Self {
            filter,
            tasks: filter.apply(tasks),
            stats: TaskStats::from_tasks(tasks),
            staff: staff
                .iter()
                .map(|member| StaffRow {
                    member,
                    active_load: active_load(tasks, member.id),
                })
                .collect(),
        }
    }

    pub fn staff_count(&self) -> usize {
        self.staff.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerBoard<'a> {
    pub display_name: &'a str,
    pub phone_number: Option<&'a str>,
    /// None renders the empty state
    pub active: Option<&'a Task>,
}

impl<'a> WorkerBoard<'a> {
    pub fn build(identity: &'a Identity, tasks: &'a [Task]) -> Self {
        Self {
            display_name: &identity.display_name,
            phone_number: identity.phone_number.as_deref(),
            active: active_task(tasks),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Board<'a> {
    Admin(AdminBoard<'a>),
    Worker(WorkerBoard<'a>),
}

/// Pick the board for the identity's role.
///
/// The backend already scopes a worker's task list to their own tasks, so
/// the snapshot is used as-is for both roles.
pub fn board_for<'a>(
    identity: &'a Identity,
    tasks: &'a [Task],
    staff: &'a [StaffMember],
    filter: TaskFilter,
) -> Board<'a> {
    if identity.is_privileged {
        Board::Admin(AdminBoard::build(tasks, staff, filter))
    } else {
        Board::Worker(WorkerBoard::build(identity, tasks))
    }
}
