//! 课表条目校验与冲突检测
//!
//! 同一 (星期, 节次) 内，同一教师、同一班级或同一教室只能出现一次。

use std::collections::HashMap;

use crate::models::timetables::{
    ConflictKind, DayOfWeek, TimetableConflict, TimetableEntryInput,
};
use crate::utils::validate::validate_time_range;

pub(crate) fn validate_entries(entries: &[TimetableEntryInput]) -> Result<(), String> {
    for (index, entry) in entries.iter().enumerate() {
        if entry.period_order < 1 {
            return Err(format!("Entry {index}: period order must be at least 1"));
        }
        validate_time_range(&entry.start_time, &entry.end_time)
            .map_err(|msg| format!("Entry {index}: {msg}"))?;
    }
    Ok(())
}

pub(crate) fn detect_conflicts(entries: &[TimetableEntryInput]) -> Vec<TimetableConflict> {
    let mut occupied: HashMap<(ConflictKind, i64, DayOfWeek, i32), usize> = HashMap::new();
    let mut conflicts = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let resources = [
            (ConflictKind::Teacher, Some(entry.teacher_id)),
            (ConflictKind::Class, Some(entry.class_id)),
            (ConflictKind::Room, entry.room_id),
        ];
        for (kind, resource_id) in resources {
            let Some(resource_id) = resource_id else {
                continue;
            };
            let key = (kind, resource_id, entry.day_of_week, entry.period_order);
            match occupied.get(&key) {
                Some(&first_index) => conflicts.push(TimetableConflict {
                    kind,
                    resource_id,
                    day_of_week: entry.day_of_week,
                    period_order: entry.period_order,
                    first_index,
                    second_index: index,
                }),
                None => {
                    occupied.insert(key, index);
                }
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        class_id: i64,
        teacher_id: i64,
        room_id: Option<i64>,
        day: DayOfWeek,
        period: i32,
    ) -> TimetableEntryInput {
        TimetableEntryInput {
            class_id,
            subject_id: 1,
            teacher_id,
            room_id,
            day_of_week: day,
            period_order: period,
            start_time: "08:00".into(),
            end_time: "08:45".into(),
        }
    }

    #[test]
    fn test_no_conflicts() {
        let entries = vec![
            entry(1, 10, Some(100), DayOfWeek::Monday, 1),
            entry(2, 11, Some(101), DayOfWeek::Monday, 1),
            entry(1, 10, Some(100), DayOfWeek::Monday, 2),
            entry(1, 10, Some(100), DayOfWeek::Tuesday, 1),
        ];
        assert!(detect_conflicts(&entries).is_empty());
    }

    #[test]
    fn test_teacher_conflict() {
        let entries = vec![
            entry(1, 10, None, DayOfWeek::Monday, 1),
            entry(2, 10, None, DayOfWeek::Monday, 1),
        ];
        let conflicts = detect_conflicts(&entries);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Teacher);
        assert_eq!(conflicts[0].resource_id, 10);
        assert_eq!((conflicts[0].first_index, conflicts[0].second_index), (0, 1));
    }

    #[test]
    fn test_class_and_room_conflicts() {
        let entries = vec![
            entry(1, 10, Some(100), DayOfWeek::Friday, 3),
            entry(1, 11, Some(100), DayOfWeek::Friday, 3),
        ];
        let kinds: Vec<ConflictKind> = detect_conflicts(&entries).iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ConflictKind::Class, ConflictKind::Room]);
    }

    #[test]
    fn test_rooms_without_id_never_clash() {
        let entries = vec![
            entry(1, 10, None, DayOfWeek::Monday, 1),
            entry(2, 11, None, DayOfWeek::Monday, 1),
        ];
        assert!(detect_conflicts(&entries).is_empty());
    }

    #[test]
    fn test_validate_entries() {
        let mut bad_period = entry(1, 10, None, DayOfWeek::Monday, 0);
        assert!(validate_entries(std::slice::from_ref(&bad_period)).is_err());

        bad_period.period_order = 1;
        bad_period.start_time = "09:00".into();
        bad_period.end_time = "08:00".into();
        let err = validate_entries(&[bad_period]).unwrap_err();
        assert!(err.contains("Start time must be before end time"));

        assert!(validate_entries(&[entry(1, 10, None, DayOfWeek::Monday, 1)]).is_ok());
    }
}
