//! Day planner: four fixed slots and first-fit task placement.

use thiserror::Error;

use crate::types::{DaySchedule, SLOT_HOURS, SLOT_MINUTES, SLOTS_PER_DAY, Slot, Task, TaskStatus};

/// Why a task could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("Duration must be a positive number of minutes.")]
    InvalidDuration,
    #[error("No available slot found that can fit {0} minutes.")]
    NoCapacity(u32),
}

/// Today's date in the host's local time, `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Build an empty schedule: four 240-minute slots starting at `start_hour`.
pub fn new_day(date: &str, start_hour: u8) -> DaySchedule {
    let mut hour = start_hour % 24;
    let slots = (0..SLOTS_PER_DAY)
        .map(|i| {
            let slot = Slot {
                index: i as u8,
                start_hour: hour,
                total_minutes: SLOT_MINUTES,
                remaining_minutes: SLOT_MINUTES,
                tasks: Vec::new(),
            };
            hour = (hour + SLOT_HOURS) % 24;
            slot
        })
        .collect();
    DaySchedule {
        date: date.to_string(),
        slots,
    }
}

/// `"07:00 - 11:00"`; wraps past midnight.
pub fn time_range(start_hour: u8) -> String {
    let end = (start_hour + SLOT_HOURS) % 24;
    format!("{start_hour:02}:00 - {end:02}:00")
}

/// Index of the earliest slot that can still fit `duration` minutes.
pub fn first_fit(schedule: &DaySchedule, duration: u32) -> Option<usize> {
    schedule
        .slots
        .iter()
        .position(|slot| slot.remaining_minutes >= duration)
}

/// Place a new pending task in the earliest slot with room for it.
/// Returns the slot index and the new task. The schedule is left untouched
/// on error.
pub fn place_task(
    schedule: &mut DaySchedule,
    name: &str,
    duration: u32,
) -> Result<(usize, Task), PlacementError> {
    if duration == 0 {
        return Err(PlacementError::InvalidDuration);
    }
    let index = first_fit(schedule, duration).ok_or(PlacementError::NoCapacity(duration))?;
    let task = Task::new(name, duration);
    let slot = &mut schedule.slots[index];
    slot.tasks.push(task.clone());
    slot.remaining_minutes -= duration;
    tracing::debug!(
        "📅 Placed '{}' ({}m) in slot {} ({}m left)",
        name,
        duration,
        slot.number(),
        slot.remaining_minutes
    );
    Ok((index, task))
}

/// Tasks not yet started, in slot order.
pub fn pending_tasks(schedule: &DaySchedule) -> Vec<&Task> {
    tasks_where(schedule, |t| t.status == TaskStatus::Pending)
}

/// Tasks that can still be completed (pending or in progress).
pub fn open_tasks(schedule: &DaySchedule) -> Vec<&Task> {
    tasks_where(schedule, |t| t.status != TaskStatus::Completed)
}

fn tasks_where<F>(schedule: &DaySchedule, pred: F) -> Vec<&Task>
where
    F: Fn(&Task) -> bool,
{
    schedule
        .slots
        .iter()
        .flat_map(|slot| slot.tasks.iter())
        .filter(|t| pred(t))
        .collect()
}

/// Find a task by id.
pub fn find_task_mut<'a>(schedule: &'a mut DaySchedule, task_id: &str) -> Option<&'a mut Task> {
    schedule
        .slots
        .iter_mut()
        .flat_map(|slot| slot.tasks.iter_mut())
        .find(|t| t.id == task_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_day_has_four_slots() {
        let day = new_day("2026-03-01", 7);
        assert_eq!(day.slots.len(), 4);
        let hours: Vec<u8> = day.slots.iter().map(|s| s.start_hour).collect();
        assert_eq!(hours, vec![7, 11, 15, 19]);
        assert!(day.slots.iter().all(|s| s.remaining_minutes == 240));
    }

    #[test]
    fn test_start_hours_wrap_midnight() {
        let day = new_day("2026-03-01", 22);
        let hours: Vec<u8> = day.slots.iter().map(|s| s.start_hour).collect();
        assert_eq!(hours, vec![22, 2, 6, 10]);
        assert_eq!(time_range(22), "22:00 - 02:00");
        assert_eq!(time_range(7), "07:00 - 11:00");
    }

    #[test]
    fn test_place_fills_earliest_slot_first() {
        let mut day = new_day("d", 8);
        let (idx, _) = place_task(&mut day, "Deep work", 180).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(day.slots[0].remaining_minutes, 60);

        // Doesn't fit in slot 0 any more, goes to slot 1.
        let (idx, _) = place_task(&mut day, "Writing", 90).unwrap();
        assert_eq!(idx, 1);

        // Small task goes back to the earliest slot with room.
        let (idx, task) = place_task(&mut day, "Email", 60).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(day.slots[0].remaining_minutes, 0);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn test_place_rejects_when_nothing_fits() {
        let mut day = new_day("d", 8);
        for slot in day.slots.iter_mut() {
            slot.remaining_minutes = 30;
        }
        let before = day.clone();
        assert_eq!(
            place_task(&mut day, "Long", 31),
            Err(PlacementError::NoCapacity(31))
        );
        assert_eq!(day, before);
        assert_eq!(
            place_task(&mut day, "Longer than a slot", 241),
            Err(PlacementError::NoCapacity(241))
        );
    }

    #[test]
    fn test_place_rejects_zero_duration() {
        let mut day = new_day("d", 8);
        assert_eq!(
            place_task(&mut day, "Nothing", 0),
            Err(PlacementError::InvalidDuration)
        );
    }

    #[test]
    fn test_exact_fit_uses_slot() {
        let mut day = new_day("d", 8);
        let (idx, _) = place_task(&mut day, "Full", 240).unwrap();
        assert_eq!(idx, 0);
        let (idx, _) = place_task(&mut day, "Next", 1).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_first_fit_matches_linear_search() {
        // Every duration lands in the earliest slot with capacity >= duration.
        let remaining = [100, 20, 240, 50];
        for duration in 1..=240 {
            let mut day = new_day("d", 0);
            for (slot, r) in day.slots.iter_mut().zip(remaining) {
                slot.remaining_minutes = r;
            }
            let expected = remaining.iter().position(|r| *r >= duration);
            match place_task(&mut day, "t", duration) {
                Ok((idx, _)) => {
                    assert_eq!(Some(idx), expected);
                    assert_eq!(day.slots[idx].remaining_minutes, remaining[idx] - duration);
                }
                Err(_) => assert_eq!(expected, None),
            }
        }
    }

    #[test]
    fn test_task_listings() {
        let mut day = new_day("d", 8);
        let (_, a) = place_task(&mut day, "a", 10).unwrap();
        let (_, b) = place_task(&mut day, "b", 10).unwrap();
        let (_, c) = place_task(&mut day, "c", 10).unwrap();
        find_task_mut(&mut day, &b.id).unwrap().status = TaskStatus::InProgress;
        find_task_mut(&mut day, &c.id).unwrap().status = TaskStatus::Completed;

        let pending: Vec<&str> = pending_tasks(&day).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(pending, vec!["a"]);
        let open: Vec<&str> = open_tasks(&day).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(open, vec!["a", "b"]);
        assert!(find_task_mut(&mut day, &a.id).is_some());
        assert!(find_task_mut(&mut day, "missing").is_none());
    }

    #[test]
    fn test_today_format() {
        let t = today();
        assert_eq!(t.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&t, "%Y-%m-%d").is_ok());
    }
}
