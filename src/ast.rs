//! # PQL - Abstract Syntax Tree
//!
//! This module defines the data that flows through the query front-end of the
//! bitmap index: tokens from the lexer, the unbound parse tree produced by the
//! grammar parser, and the typed [`Query`] tree produced by the binder.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens and source positions
//! - **[raw]** - Unbound calls as written (`RawCall`, `RawArgument`, `RawValue`)
//! - **[query]** - Bound, typed queries (`Query`, `ArgValue`)
//!
//! ## Quick Start
//!
//! ```text
//! union(get(10, general), get(id=11, frame=brand), get(12))
//! ```
//!
//! This query unions three bitmaps. Each `get` resolves its `id` and `frame`
//! against the operation schema, and the three `get` calls become ordered
//! subqueries of the `union`.
//!
//! ## Core Concepts
//!
//! ### Calls
//!
//! Every query is a single top-level call. Arguments are values, keyword
//! arguments (`name=value`), bracketed lists, or further calls:
//!
//! ```text
//! top-n(get(10, general), [1, 2, 3], n=50)
//! ```
//!
//! ### Binding
//!
//! The parser does not know what an argument means. The binder looks the
//! operation up in a [`SchemaRegistry`](crate::schema::SchemaRegistry) and
//! assigns arguments to parameter slots:
//!
//! - **Keyword arguments** claim their named slot wherever they appear
//! - **Positional arguments** fill the remaining slots left to right
//! - **Defaults** fill slots nobody supplied
//! - **Nested calls** become subqueries, in source order
//!
//! Operations missing from the registry are bound in pass-through mode: their
//! nested calls become subqueries and everything else is dropped.
pub mod query;
pub mod raw;
pub mod tokens;

pub use query::{ArgValue, Query};
pub use raw::{RawArgument, RawCall, RawValue};
pub use tokens::{Position, Token, TokenKind};
