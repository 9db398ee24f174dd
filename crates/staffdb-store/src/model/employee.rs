use std::fmt;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::identity::Handle;
use crate::model::Review;
use crate::repo::Repository;
use crate::row::RawRow;
use crate::schema::{Column, Keyed, NamedRecord, Record};

/// An employee, belonging to one department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(skip_deserializing)]
    id: Option<i64>,
    pub name: String,
    pub job_title: String,
    /// References `departments.id`; checked by the database, not here
    pub department_id: i64,
}

impl Employee {
    /// Unsaved employee
    pub fn new(name: impl Into<String>, job_title: impl Into<String>, department_id: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            job_title: job_title.into(),
            department_id,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// This employee's reviews, in insertion order
    ///
    /// An unsaved employee has no reviews.
    pub fn reviews(&self, reviews: &mut Repository<'_, Review>) -> Result<Vec<Handle<Review>>> {
        match self.id {
            Some(id) => reviews.find_where("employee_id", id),
            None => Ok(Vec::new()),
        }
    }
}

impl Keyed for Employee {
    fn assign_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

impl Record for Employee {
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [Column] = &[
        Column::text("name"),
        Column::text("job_title"),
        Column::integer("department_id").references("departments"),
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.job_title.clone()),
            Value::Integer(self.department_id),
        ]
    }

    fn from_row(row: &RawRow) -> Result<Self> {
        let mut employee = Employee::new(String::new(), String::new(), 0);
        employee.id = row.id()?;
        employee.refresh(row)?;
        Ok(employee)
    }

    fn refresh(&mut self, row: &RawRow) -> Result<()> {
        self.name = row.get(1)?;
        self.job_title = row.get(2)?;
        self.department_id = row.get(3)?;
        Ok(())
    }
}

impl NamedRecord for Employee {}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Employee {}: ", id)?,
            None => write!(f, "<Employee unsaved: ")?,
        }
        write!(
            f,
            "{}, {}, Department ID: {}>",
            self.name, self.job_title, self.department_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let mut employee = Employee::new("Raha", "Accountant", 1);
        employee.assign_id(Some(5));
        assert_eq!(
            employee.to_string(),
            "<Employee 5: Raha, Accountant, Department ID: 1>"
        );
    }

    #[test]
    fn test_refresh_keeps_id() {
        let mut employee = Employee::new("Raha", "Accountant", 1);
        employee.assign_id(Some(5));
        let row = RawRow::new(vec![
            Value::Integer(5),
            Value::Text("Raha Lee".to_string()),
            Value::Text("Senior Accountant".to_string()),
            Value::Integer(2),
        ]);

        employee.refresh(&row).unwrap();

        assert_eq!(employee.id(), Some(5));
        assert_eq!(employee.name, "Raha Lee");
        assert_eq!(employee.job_title, "Senior Accountant");
        assert_eq!(employee.department_id, 2);
    }

    #[test]
    fn test_null_department_is_rejected() {
        let row = RawRow::new(vec![
            Value::Integer(1),
            Value::Text("Amir".to_string()),
            Value::Text("Programmer".to_string()),
            Value::Null,
        ]);
        assert!(Employee::from_row(&row).is_err());
    }
}
