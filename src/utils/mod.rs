//! Helpers shared by the experiment binary and the test suites.
//!
//! - **`problems`**: reproducible column sets (random, nearly dependent) and the
//!   routine that turns them into an orthonormal basis through repeated
//!   reorthogonalization, together with the loss-of-orthogonality metric used
//!   to judge the result.

pub mod problems;
