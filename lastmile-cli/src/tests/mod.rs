//! Unit and behaviour tests for the `lastmile` CLI.

use super::*;

mod helpers;
