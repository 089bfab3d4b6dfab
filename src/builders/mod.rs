// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These modules hold the pure building blocks the engine composes:
// none of them touch the filesystem or keep state between calls.

// The `pub mod formatter;` declaration exposes the `formatter` module.
//
// `formatter` module:
// Re-indents a raw comment block so it lines up with the declaration it
// documents. `*` lines get one extra space to sit under the `/**` opener.
pub mod formatter;

// The `pub mod patterns;` declaration exposes the `patterns` module.
//
// `patterns` module:
// This is a fundamental module that defines the declaration shapes
// (`DeclarationKind`) and the `PatternMatcher` trait. It holds the regexes for
// classes, functions, methods and arrow functions, the order they are tried in,
// and the tag matcher used on existing comments.
pub mod patterns;

// The `pub mod reporter;` declaration exposes the `reporter` module.
//
// `reporter` module:
// Turns a `ScanResult` into the summary shown to the user. It defines a
// `Notifier` trait and its `ConsoleReporter` implementation.
pub mod reporter;

// The `pub mod synthesizer;` declaration exposes the `synthesizer` module.
//
// `synthesizer` module:
// Builds the unindented text of new class and function comments from a
// `DeclarationMatch` and the configured template placeholders.
pub mod synthesizer;

// The `pub mod validator;` declaration exposes the `validator` module.
//
// `validator` module:
// Decides what happens to comment blocks that already exist (`CommentValidator`)
// and checks the configuration for values that would produce broken comments
// (`ConfigValidator`). `StandardValidator` implements both.
pub mod validator;
