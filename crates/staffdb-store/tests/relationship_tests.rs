// Department → employees traversal and storage-level foreign keys

mod common;

use common::{hire, payroll, setup_session_with_tables};
use staffdb_core::ExErrorKind;
use staffdb_store::model::{Department, Employee, Review};

#[test]
fn test_department_employees() {
    let mut session = setup_session_with_tables();
    let d1 = payroll(&mut session);
    let d2 = session
        .departments()
        .create(Department::new("Human Resources", "Building C, 2nd Floor"))
        .unwrap();
    let e1 = hire(&mut session, "Raha", "Accountant", d1.id().unwrap());
    hire(&mut session, "Tal", "Benefits Coordinator", d2.id().unwrap());
    let e3 = hire(&mut session, "Sasha", "Manager", d1.id().unwrap());

    let employees = d1.borrow().employees(&mut session.employees()).unwrap();

    assert_eq!(employees.len(), 2);
    assert!(employees[0].ptr_eq(&e1));
    assert!(employees[1].ptr_eq(&e3));
}

#[test]
fn test_employee_with_unknown_department_is_rejected() {
    let mut session = setup_session_with_tables();

    let err = session
        .employees()
        .create(Employee::new("Ghost", "Nobody", 99))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert!(err.message().contains("FOREIGN KEY"));
    assert!(session.employees().get_all().unwrap().is_empty());
    assert!(session.employees().identity_map().is_empty());
}

#[test]
fn test_review_for_unknown_employee_is_rejected() {
    let mut session = setup_session_with_tables();

    let err = session
        .reviews()
        .create(Review::new(2022, "Orphan", 42))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
}

#[test]
fn test_deleting_referenced_department_is_rejected() {
    let mut session = setup_session_with_tables();
    let department = payroll(&mut session);
    hire(&mut session, "Raha", "Accountant", department.id().unwrap());

    let err = session.departments().delete(&department).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    // Failed delete leaves the object saved and cached
    assert!(department.id().is_some());
    assert!(session
        .departments()
        .identity_map()
        .contains(department.id().unwrap()));
}

#[test]
fn test_identity_maps_are_per_session() {
    let mut session = setup_session_with_tables();
    let department = payroll(&mut session);
    let id = department.id().unwrap();

    session.clear_identity_maps();
    let reloaded = session.departments().find_by_id(id).unwrap().unwrap();

    assert!(!reloaded.ptr_eq(&department));
    assert_eq!(*reloaded.borrow(), *department.borrow());

    let again = session.departments().find_by_id(id).unwrap().unwrap();
    assert!(again.ptr_eq(&reloaded));
}

#[test]
fn test_dropping_referenced_table_is_rejected() {
    let mut session = setup_session_with_tables();
    let department = payroll(&mut session);
    let employee = hire(&mut session, "Raha", "Accountant", department.id().unwrap());
    session
        .reviews()
        .create(Review::new(2023, "Excellent work!", employee.id().unwrap()))
        .unwrap();

    let err = session.employees().drop_table().unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert!(session.employees().table_exists().unwrap());
    assert_eq!(session.employees().get_all().unwrap().len(), 1);

    // Children first succeeds
    session.drop_tables().unwrap();
    assert!(!session.employees().table_exists().unwrap());
}
