//! Seed records and column layouts for the three registers.

use chrono::NaiveDate;
use qgrid::{Column, FieldValue, Record};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

// --- Documents -------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocCol {
    No,
    Code,
    Title,
    Department,
    Category,
    Revision,
    Status,
    Owner,
    Effective,
    Review,
    Attachments,
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocField {
    Code,
    Title,
    Owner,
    Department,
    Status,
    Effective,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub code: String,
    pub title: &'static str,
    pub department: &'static str,
    pub category: &'static str,
    pub revision: u32,
    pub status: &'static str,
    pub owner: &'static str,
    pub effective: NaiveDate,
    pub attachments: usize,
}

impl Record for Document {
    type Field = DocField;

    fn field(&self, field: DocField) -> FieldValue<'_> {
        match field {
            DocField::Code => FieldValue::text(&self.code),
            DocField::Title => FieldValue::text(self.title),
            DocField::Owner => FieldValue::text(self.owner),
            DocField::Department => FieldValue::text(self.department),
            DocField::Status => FieldValue::text(self.status),
            DocField::Effective => self.effective.into(),
        }
    }
}

impl Document {
    pub fn cell(&self, col: DocCol, row: usize) -> String {
        match col {
            DocCol::No => (row + 1).to_string(),
            DocCol::Code => self.code.clone(),
            DocCol::Title => self.title.to_owned(),
            DocCol::Department => self.department.to_owned(),
            DocCol::Category => self.category.to_owned(),
            DocCol::Revision => format!("Rev {}", self.revision),
            DocCol::Status => self.status.to_owned(),
            DocCol::Owner => self.owner.to_owned(),
            DocCol::Effective => self.effective.to_string(),
            DocCol::Review => self
                .effective
                .checked_add_months(chrono::Months::new(12))
                .map_or_else(|| "-".to_owned(), |d| d.to_string()),
            DocCol::Attachments => self.attachments.to_string(),
            DocCol::Action => "⋮".to_owned(),
        }
    }
}

pub fn document_columns() -> Vec<Column<DocCol>> {
    vec![
        Column::new(DocCol::No, "No.", 0).locked(),
        Column::new(DocCol::Code, "Code", 1),
        Column::new(DocCol::Title, "Title", 2),
        Column::new(DocCol::Department, "Department", 3),
        Column::new(DocCol::Category, "Category", 4),
        Column::new(DocCol::Revision, "Revision", 5),
        Column::new(DocCol::Status, "Status", 6),
        Column::new(DocCol::Owner, "Owner", 7),
        Column::new(DocCol::Effective, "Effective", 8),
        Column::new(DocCol::Review, "Next Review", 9).hidden(),
        Column::new(DocCol::Attachments, "Files", 10).hidden(),
        Column::new(DocCol::Action, "", 11).locked(),
    ]
}

pub fn documents() -> Vec<Document> {
    const TITLES: [&str; 8] = [
        "Document Control Procedure",
        "Internal Audit SOP",
        "Calibration Work Instruction",
        "Supplier Evaluation Form",
        "CAPA Procedure",
        "Cleanroom Gowning SOP",
        "Training Matrix",
        "Management Review Minutes",
    ];
    const DEPARTMENTS: [&str; 4] = ["Quality Assurance", "Production", "Engineering", "Procurement"];
    const CATEGORIES: [&str; 3] = ["Procedure", "Work Instruction", "Form"];
    const STATUSES: [&str; 4] = ["Draft", "In Review", "Approved", "Obsolete"];
    const OWNERS: [&str; 5] = ["A. Rahman", "M. Tan", "S. Kaur", "J. Lim", "Đặng Thu"];

    (0..26)
        .map(|i| Document {
            code: format!("QMS-{:03}", 100 + i),
            title: TITLES[i % TITLES.len()],
            department: DEPARTMENTS[(i / 2) % DEPARTMENTS.len()],
            category: CATEGORIES[i % CATEGORIES.len()],
            revision: (i % 4) as u32,
            status: STATUSES[(i * 3) % STATUSES.len()],
            owner: OWNERS[i % OWNERS.len()],
            effective: date(2023 + (i % 2) as i32, 1 + (i % 12) as u32, 1 + (i % 28) as u32),
            attachments: i % 3,
        })
        .collect()
}

// --- Tasks -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskCol {
    No,
    Title,
    Assignee,
    Priority,
    Due,
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Assignee,
    Priority,
    Due,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub title: String,
    pub assignee: &'static str,
    pub priority: &'static str,
    pub due: Option<NaiveDate>,
}

impl Record for Task {
    type Field = TaskField;

    fn field(&self, field: TaskField) -> FieldValue<'_> {
        match field {
            TaskField::Title => FieldValue::text(&self.title),
            TaskField::Assignee => FieldValue::text(self.assignee),
            TaskField::Priority => FieldValue::text(self.priority),
            TaskField::Due => self.due.into(),
        }
    }
}

impl Task {
    pub fn cell(&self, col: TaskCol, row: usize) -> String {
        match col {
            TaskCol::No => (row + 1).to_string(),
            TaskCol::Title => self.title.clone(),
            TaskCol::Assignee => self.assignee.to_owned(),
            TaskCol::Priority => self.priority.to_owned(),
            TaskCol::Due => self.due.map_or_else(|| "-".to_owned(), |d| d.to_string()),
            TaskCol::Action => "⋮".to_owned(),
        }
    }
}

pub fn task_columns() -> Vec<Column<TaskCol>> {
    vec![
        Column::new(TaskCol::No, "No.", 0).locked(),
        Column::new(TaskCol::Title, "Task", 1),
        Column::new(TaskCol::Assignee, "Assignee", 2),
        Column::new(TaskCol::Priority, "Priority", 3),
        Column::new(TaskCol::Due, "Due", 4),
        Column::new(TaskCol::Action, "", 5).locked(),
    ]
}

pub fn tasks() -> Vec<Task> {
    const ASSIGNEES: [&str; 4] = ["M. Tan", "S. Kaur", "J. Lim", "A. Rahman"];
    const PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];
    const VERBS: [&str; 5] = ["Review", "Approve", "Close", "Verify", "Update"];
    const SUBJECTS: [&str; 4] = ["CAPA-17", "NCR-203", "Audit finding 4", "Risk register"];

    (0..17)
        .map(|i| Task {
            title: format!(
                "{} {}",
                VERBS[i % VERBS.len()],
                SUBJECTS[(i / 2) % SUBJECTS.len()]
            ),
            assignee: ASSIGNEES[i % ASSIGNEES.len()],
            priority: PRIORITIES[(i * 2) % PRIORITIES.len()],
            due: (i % 5 != 4).then(|| date(2024, 3 + (i % 6) as u32, 5 + i as u32)),
        })
        .collect()
}

// --- Training --------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainingCol {
    No,
    Employee,
    Course,
    Completed,
    Result,
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingField {
    Employee,
    Course,
    Completed,
    Result,
}

#[derive(Debug, Clone)]
pub struct Training {
    pub employee: &'static str,
    pub course: &'static str,
    pub completed: NaiveDate,
    pub result: &'static str,
}

impl Record for Training {
    type Field = TrainingField;

    fn field(&self, field: TrainingField) -> FieldValue<'_> {
        match field {
            TrainingField::Employee => FieldValue::text(self.employee),
            TrainingField::Course => FieldValue::text(self.course),
            TrainingField::Completed => self.completed.into(),
            TrainingField::Result => FieldValue::text(self.result),
        }
    }
}

impl Training {
    pub fn cell(&self, col: TrainingCol, row: usize) -> String {
        match col {
            TrainingCol::No => (row + 1).to_string(),
            TrainingCol::Employee => self.employee.to_owned(),
            TrainingCol::Course => self.course.to_owned(),
            TrainingCol::Completed => self.completed.to_string(),
            TrainingCol::Result => self.result.to_owned(),
            TrainingCol::Action => "⋮".to_owned(),
        }
    }
}

pub fn training_columns() -> Vec<Column<TrainingCol>> {
    vec![
        Column::new(TrainingCol::No, "No.", 0).locked(),
        Column::new(TrainingCol::Employee, "Employee", 1),
        Column::new(TrainingCol::Course, "Course", 2),
        Column::new(TrainingCol::Completed, "Completed", 3),
        Column::new(TrainingCol::Result, "Result", 4),
        Column::new(TrainingCol::Action, "", 5).locked(),
    ]
}

pub fn training() -> Vec<Training> {
    const EMPLOYEES: [&str; 6] = ["M. Tan", "S. Kaur", "J. Lim", "A. Rahman", "Đặng Thu", "山田 花子"];
    const COURSES: [&str; 4] = ["GMP Basics", "ISO 9001 Awareness", "Internal Auditor", "Root Cause Analysis"];
    const RESULTS: [&str; 3] = ["Pass", "Pass", "Fail"];

    (0..64)
        .map(|i| Training {
            employee: EMPLOYEES[i % EMPLOYEES.len()],
            course: COURSES[(i / 3) % COURSES.len()],
            completed: date(2024, 1 + (i % 12) as u32, 1 + (i * 7 % 28) as u32),
            result: RESULTS[i % RESULTS.len()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgrid::ColumnModel;

    #[test]
    fn column_layouts_are_valid() {
        assert!(ColumnModel::new(document_columns()).is_ok());
        assert!(ColumnModel::new(task_columns()).is_ok());
        assert!(ColumnModel::new(training_columns()).is_ok());
    }

    #[test]
    fn seed_dates_are_real() {
        let default = NaiveDate::default();
        assert!(documents().iter().all(|d| d.effective != default));
        assert!(tasks().iter().filter_map(|t| t.due).all(|d| d != default));
        assert!(training().iter().all(|t| t.completed != default));
    }
}
