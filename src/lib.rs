// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod events;
pub mod format;
pub mod logging;
pub mod models;
pub mod render;
pub mod report;
pub mod store;
pub mod utils;
