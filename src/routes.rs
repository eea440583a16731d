pub mod dashboard;
pub mod diagnostics;
pub mod index;
pub mod student_form;
pub mod student_list;
