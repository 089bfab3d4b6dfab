// This file is the module declaration file for the `core` module.
// In Rust, a `mod.rs` file within a directory (e.g., `src/core/`)
// serves two main purposes:
//
// 1. It declares the submodules contained within that directory.
// 2. It exposes these submodules to the parent module (`src/` in this case),
//    making them accessible to the entire crate.

// `config` module:
// This module is responsible for managing the application's configuration.
// It defines the data structures for the configuration file (`GeneratorConfig`),
// provides a `ConfigProvider` trait for abstracting configuration access, and
// includes a `ConfigManager` to handle file I/O operations like loading,
// saving, validating and exporting the configuration.
pub mod config;

// `document` module:
// The read side of the host: positions, lines, line ranges, the `TextSource`
// trait the engine reads through, and the in-memory `Document` the CLI uses.
pub mod document;

// `edits` module:
// The write side of the host: the `EditSink` trait and `EditBatch`, which
// applies all edits of one scan as a single all-or-nothing transaction.
pub mod edits;

// `engine` module:
// The range scanner. It walks a line range, tracks whether it is inside an
// existing comment block, and emits new or normalized comments into a sink.
pub mod engine;
