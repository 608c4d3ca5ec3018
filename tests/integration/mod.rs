// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod catalog_publish_test;
pub mod discovery_run_test;
pub mod helpers;
