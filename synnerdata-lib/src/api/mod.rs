//! REST API operations

mod crud;
