use std::fmt;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::row::RawRow;
use crate::schema::{Column, Keyed, Record};

/// A yearly performance review for one employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(skip_deserializing)]
    id: Option<i64>,
    pub year: i64,
    pub summary: String,
    /// References `employees.id`
    pub employee_id: i64,
}

impl Review {
    /// Unsaved review
    pub fn new(year: i64, summary: impl Into<String>, employee_id: i64) -> Self {
        Self {
            id: None,
            year,
            summary: summary.into(),
            employee_id,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Keyed for Review {
    fn assign_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

impl Record for Review {
    const TABLE: &'static str = "reviews";
    const COLUMNS: &'static [Column] = &[
        Column::integer("year"),
        Column::text("summary"),
        Column::integer("employee_id").references("employees"),
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.year),
            Value::Text(self.summary.clone()),
            Value::Integer(self.employee_id),
        ]
    }

    fn from_row(row: &RawRow) -> Result<Self> {
        let mut review = Review::new(0, String::new(), 0);
        review.id = row.id()?;
        review.refresh(row)?;
        Ok(review)
    }

    fn refresh(&mut self, row: &RawRow) -> Result<()> {
        self.year = row.get(1)?;
        self.summary = row.get(2)?;
        self.employee_id = row.get(3)?;
        Ok(())
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Review {}: ", id)?,
            None => write!(f, "<Review unsaved: ")?,
        }
        write!(f, "{}, {}, Employee: {}>", self.year, self.summary, self.employee_id)
    }
}
