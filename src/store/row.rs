//! Flat row layout of a persisted scheduled lesson.
//!
//! One row per lesson, with the column names of the schedule export file.
//! Start time is `HH:MM` and duration is in hours.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::models::{
    format_clock, parse_clock, CourseId, LessonOffering, ScheduleId, ScheduledLesson,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    #[serde(rename = "ScheduleID")]
    pub schedule_id: ScheduleId,
    #[serde(rename = "LessonType")]
    pub lesson_type: String,
    #[serde(rename = "CourseID")]
    pub course_id: CourseId,
    #[serde(rename = "Day")]
    pub day: String,
    #[serde(rename = "StartTime")]
    pub start_time: String,
    /// Hours.
    #[serde(rename = "Duration")]
    pub duration: f64,
    #[serde(rename = "Classroom")]
    pub classroom: String,
    #[serde(rename = "Building")]
    pub building: String,
    #[serde(rename = "Teacher")]
    pub teacher: String,
    #[serde(rename = "GroupID")]
    pub group_id: String,
}

impl From<&ScheduledLesson> for ScheduleRow {
    fn from(lesson: &ScheduledLesson) -> Self {
        let o = &lesson.offering;
        Self {
            schedule_id: lesson.schedule_id,
            lesson_type: o.lesson_type.to_string(),
            course_id: o.course_id,
            day: o.day.to_string(),
            start_time: format_clock(o.start_min),
            duration: f64::from(o.duration_min) / 60.0,
            classroom: o.room.clone(),
            building: o.building.clone(),
            teacher: o.instructor.clone(),
            group_id: o.group_id.clone(),
        }
    }
}

impl TryFrom<&ScheduleRow> for ScheduledLesson {
    type Error = TimetableError;

    fn try_from(row: &ScheduleRow) -> Result<Self> {
        if !row.duration.is_finite() || row.duration < 0.0 {
            return Err(TimetableError::Parse(format!(
                "invalid duration {} for course {} group '{}'",
                row.duration, row.course_id, row.group_id
            )));
        }
        let duration_min = (row.duration * 60.0).round() as u32;
        let offering = LessonOffering::new(
            row.course_id,
            row.lesson_type.parse()?,
            row.group_id.clone(),
            row.day.parse()?,
            parse_clock(&row.start_time)?,
            duration_min,
        )
        .with_room(row.classroom.clone())
        .with_building(row.building.clone())
        .with_instructor(row.teacher.clone());
        Ok(ScheduledLesson::new(row.schedule_id, offering))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LessonType, Weekday};

    fn sample_lesson() -> ScheduledLesson {
        ScheduledLesson::new(
            4,
            LessonOffering::new(100, LessonType::Lab, "LB2", Weekday::Thursday, 14 * 60 + 30, 90)
                .with_room("B-12")
                .with_building("Science")
                .with_instructor("Dr. Ruiz"),
        )
    }

    #[test]
    fn test_row_layout() {
        let row = ScheduleRow::from(&sample_lesson());
        assert_eq!(row.lesson_type, "Lab");
        assert_eq!(row.day, "Thursday");
        assert_eq!(row.start_time, "14:30");
        assert!((row.duration - 1.5).abs() < 1e-10);
        assert_eq!(row.classroom, "B-12");
        assert_eq!(row.teacher, "Dr. Ruiz");
    }

    #[test]
    fn test_row_back_to_lesson() {
        let lesson = sample_lesson();
        let row = ScheduleRow::from(&lesson);
        assert_eq!(ScheduledLesson::try_from(&row).unwrap(), lesson);
    }

    #[test]
    fn test_column_names() {
        let json = serde_json::to_value(ScheduleRow::from(&sample_lesson())).unwrap();
        for column in [
            "ScheduleID", "LessonType", "CourseID", "Day", "StartTime", "Duration",
            "Classroom", "Building", "Teacher", "GroupID",
        ] {
            assert!(json.get(column).is_some(), "missing {column}");
        }
    }

    #[test]
    fn test_bad_rows_are_rejected() {
        let mut row = ScheduleRow::from(&sample_lesson());
        row.day = "Funday".into();
        assert!(ScheduledLesson::try_from(&row).is_err());

        let mut row = ScheduleRow::from(&sample_lesson());
        row.start_time = "25:00".into();
        assert!(ScheduledLesson::try_from(&row).is_err());

        let mut row = ScheduleRow::from(&sample_lesson());
        row.duration = -1.0;
        assert!(ScheduledLesson::try_from(&row).is_err());
    }

    #[test]
    fn test_abbreviated_day_is_accepted() {
        let mut row = ScheduleRow::from(&sample_lesson());
        row.day = "thu".into();
        let lesson = ScheduledLesson::try_from(&row).unwrap();
        assert_eq!(lesson.day(), Weekday::Thursday);
    }
}
