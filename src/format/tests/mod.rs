//! Tests for label files, ODGT export and HICO conversion.

mod label_file_tests;
mod odgt_tests;
