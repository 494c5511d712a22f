// src/services/rotation.rs
//
// Round-robin rotation over a facility's eligible cleaners. Pure planning
// logic: the caller reads the inputs from the database, this module decides
// who cleans on which date, and the caller persists the plan in one
// transaction.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::{common::error::AppError, models::facility::StaffMember};

/// Auto-assignment covers the 7 calendar dates starting "today".
pub const WINDOW_DAYS: i64 = 7;

pub fn window_from(start: NaiveDate) -> Vec<NaiveDate> {
    (0..WINDOW_DAYS)
        .map(|offset| start + Duration::days(offset))
        .collect()
}

#[derive(Debug, Clone)]
pub struct PlannedAssignment {
    pub scheduled_date: NaiveDate,
    pub assignee: StaffMember,
}

/// Where the rotation resumes. `staff` must be non-empty and in rotation
/// order (id ascending). When the prior assignee is no longer in the pool
/// the rotation resets to the front.
pub fn start_index(staff: &[StaffMember], last_assignee: Option<Uuid>) -> usize {
    match last_assignee.and_then(|id| staff.iter().position(|s| s.id == id)) {
        Some(position) => (position + 1) % staff.len(),
        None => 0,
    }
}

/// Plan the window. Dates that already carry an assignment are skipped and
/// do not consume a rotation slot: the index advances by assignments
/// planned so far, not by calendar offset.
pub fn plan_window(
    window: &[NaiveDate],
    occupied: &HashSet<NaiveDate>,
    staff: &[StaffMember],
    last_assignee: Option<Uuid>,
) -> Result<Vec<PlannedAssignment>, AppError> {
    if staff.is_empty() {
        return Err(AppError::NoEligibleStaff);
    }

    let start = start_index(staff, last_assignee);
    let mut planned = Vec::new();
    for date in window {
        if occupied.contains(date) {
            continue;
        }
        let assignee = staff[(start + planned.len()) % staff.len()].clone();
        planned.push(PlannedAssignment {
            scheduled_date: *date,
            assignee,
        });
    }
    Ok(planned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner(name: &str) -> StaffMember {
        StaffMember {
            id: Uuid::new_v4(),
            username: name.to_string(),
            email: format!("{name}@example.com"),
            full_name: None,
        }
    }

    fn pool3() -> Vec<StaffMember> {
        vec![cleaner("alice"), cleaner("bob"), cleaner("carol")]
    }

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap() + Duration::days(offset)
    }

    #[test]
    fn window_has_seven_consecutive_dates() {
        let window = window_from(day(0));
        assert_eq!(window.len(), 7);
        assert_eq!(window[0], day(0));
        assert_eq!(window[6], day(6));
    }

    #[test]
    fn empty_pool_is_rejected() {
        let result = plan_window(&window_from(day(0)), &HashSet::new(), &[], None);
        assert!(matches!(result, Err(AppError::NoEligibleStaff)));
    }

    #[test]
    fn fresh_window_rotates_fairly() {
        let staff = pool3();
        let plan = plan_window(&window_from(day(0)), &HashSet::new(), &staff, None).unwrap();

        let names: Vec<&str> = plan.iter().map(|p| p.assignee.username.as_str()).collect();
        assert_eq!(
            names,
            ["alice", "bob", "carol", "alice", "bob", "carol", "alice"]
        );
        // Every cleaner got a turn before anyone repeated.
        assert_eq!(plan[0].scheduled_date, day(0));
        assert_eq!(plan[6].scheduled_date, day(6));
    }

    #[test]
    fn rotation_continues_after_last_assignee() {
        let staff = pool3();
        let last = Some(staff[1].id); // bob cleaned last
        let plan = plan_window(&window_from(day(0)), &HashSet::new(), &staff, last).unwrap();
        assert_eq!(plan[0].assignee.username, "carol");
    }

    #[test]
    fn rotation_resets_when_last_assignee_left_the_pool() {
        let staff = pool3();
        let gone = Some(Uuid::new_v4());
        let plan = plan_window(&window_from(day(0)), &HashSet::new(), &staff, gone).unwrap();
        assert_eq!(plan[0].assignee.username, "alice");
    }

    #[test]
    fn occupied_dates_are_skipped_without_consuming_a_slot() {
        let staff = pool3();
        let occupied: HashSet<NaiveDate> = [day(3)].into_iter().collect();
        let plan = plan_window(&window_from(day(0)), &occupied, &staff, None).unwrap();

        assert_eq!(plan.len(), 6);
        assert!(plan.iter().all(|p| p.scheduled_date != day(3)));
        // Day 4 continues where day 2 left off instead of jumping ahead.
        let names: Vec<&str> = plan.iter().map(|p| p.assignee.username.as_str()).collect();
        assert_eq!(names, ["alice", "bob", "carol", "alice", "bob", "carol"]);
    }

    #[test]
    fn fully_occupied_window_plans_nothing() {
        let staff = pool3();
        let occupied: HashSet<NaiveDate> = window_from(day(0)).into_iter().collect();
        let plan = plan_window(&window_from(day(0)), &occupied, &staff, None).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn single_cleaner_takes_every_day() {
        let staff = vec![cleaner("solo")];
        let plan = plan_window(&window_from(day(0)), &HashSet::new(), &staff, None).unwrap();
        assert_eq!(plan.len(), 7);
        assert!(plan.iter().all(|p| p.assignee.username == "solo"));
    }
}
