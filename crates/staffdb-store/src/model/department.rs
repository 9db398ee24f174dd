use std::fmt;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::identity::Handle;
use crate::model::Employee;
use crate::repo::Repository;
use crate::row::RawRow;
use crate::schema::{Column, Keyed, NamedRecord, Record};

/// A department and where it sits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(skip_deserializing)]
    id: Option<i64>,
    pub name: String,
    pub location: String,
}

impl Department {
    /// Unsaved department
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Employees assigned to this department, in id order
    ///
    /// An unsaved department has no employees.
    pub fn employees(
        &self,
        employees: &mut Repository<'_, Employee>,
    ) -> Result<Vec<Handle<Employee>>> {
        match self.id {
            Some(id) => employees.find_where("department_id", id),
            None => Ok(Vec::new()),
        }
    }
}

impl Keyed for Department {
    fn assign_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

impl Record for Department {
    const TABLE: &'static str = "departments";
    const COLUMNS: &'static [Column] = &[Column::text("name"), Column::text("location")];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.location.clone()),
        ]
    }

    fn from_row(row: &RawRow) -> Result<Self> {
        let mut department = Department::new(String::new(), String::new());
        department.id = row.id()?;
        department.refresh(row)?;
        Ok(department)
    }

    fn refresh(&mut self, row: &RawRow) -> Result<()> {
        self.name = row.get(1)?;
        self.location = row.get(2)?;
        Ok(())
    }
}

impl NamedRecord for Department {}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Department {}: {}, {}>", id, self.name, self.location),
            None => write!(f, "<Department unsaved: {}, {}>", self.name, self.location),
        }
    }
}
