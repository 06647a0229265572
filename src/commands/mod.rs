// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod config;
pub mod categories;
pub mod expenses;
pub mod incomes;
pub mod dashboard;
pub mod wallchart;
pub mod exporter;
pub mod reviews;
pub mod profile;
