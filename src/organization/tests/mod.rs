//! Unit tests for organisation validation and member migration.

mod member_tests;
