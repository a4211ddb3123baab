//! # sovran-cellmap
//!
//! An ordered map whose values come in one of three shapes.
//!
//! `sovran-cellmap` stores, under each key, a single [`Cell`]: a scalar `V`,
//! a sequence of `V`, or a piece of text. The shape is chosen when the key is
//! inserted and is enforced on every access, so reading a sequence back as a
//! scalar is an error rather than a silent conversion.
//!
//! ## Key Features
//!
//! - **Closed set of shapes**: `Cell` is a plain enum, checked with a `match`
//! - **Owned storage**: sequences and text are copied in, so the caller's
//!   buffers can change or go away afterwards
//! - **Strict and lenient APIs**: `add_*`/`get_*`/`remove` return a
//!   [`MapError`]; `try_*` return `bool` or `Option`
//! - **No partial updates**: a failed call leaves the map exactly as it was
//! - **Optional sharing**: [`SharedTypedMap`] wraps a map in `Arc<Mutex<_>>`
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_cellmap::{MapError, TypedMap};
//!
//! fn main() -> Result<(), MapError> {
//!     let mut map = TypedMap::<i32, i32>::new();
//!     assert_eq!(map.len(), 0);
//!
//!     map.add_scalar(16, 222)?;
//!     map.add_scalar(63, 333)?;
//!     map.add_sequence(142, &[4, 5, 6, 7])?;
//!     map.add_text(993, "123123")?;
//!     assert_eq!(map.len(), 4);
//!
//!     assert_eq!(map.get_scalar(&16)?, 222);
//!     assert_eq!(map.get_sequence(&142)?, &[4, 5, 6, 7]);
//!     assert_eq!(map.get_text(&993)?, "123123");
//!
//!     map.remove_all();
//!     assert_eq!(map.len(), 0);
//!     Ok(())
//! }
//! ```
//!
//! ### Strict and Lenient Operations
//!
//! ```rust
//! use sovran_cellmap::{CellKind, MapError, TypedMap};
//!
//! let mut map = TypedMap::<i32, i32>::new();
//! map.add_scalar(16, 222).unwrap();
//!
//! // A second strict add on the same key fails and changes nothing
//! assert_eq!(map.add_scalar(16, 333), Err(MapError::DuplicateKey("16".into())));
//!
//! // The lenient version just reports it
//! assert!(!map.try_add_scalar(16, 333));
//! assert!(map.try_add_scalar(22, 444));
//! assert_eq!(map.get_scalar(&16), Ok(222));
//!
//! // Asking for the wrong shape
//! match map.get_sequence(&16) {
//!     Ok(values) => println!("values: {:?}", values),
//!     Err(MapError::WrongVariant { expected, actual, .. }) => {
//!         assert_eq!(expected, CellKind::Sequence);
//!         assert_eq!(actual, CellKind::Scalar);
//!     }
//!     Err(e) => println!("Other error: {}", e),
//! }
//! assert_eq!(map.try_get_sequence(&16), None);
//! ```
//!
//! ### Replacing Values
//!
//! ```rust
//! use sovran_cellmap::{MapError, TypedMap};
//!
//! let mut map = TypedMap::<&str, f64>::new();
//! map.add_or_replace_scalar("reading", 1.5);
//! map.add_or_replace_sequence("reading", &[2.0, 3.0]);
//!
//! assert_eq!(map.get_sequence(&"reading").unwrap(), &[2.0, 3.0]);
//! assert!(matches!(
//!     map.get_scalar(&"reading"),
//!     Err(MapError::WrongVariant { .. })
//! ));
//! ```

mod cell;
mod error;
mod map;
mod shared;

pub use cell::{Cell, CellKind};
pub use error::MapError;
pub use map::TypedMap;
pub use shared::SharedTypedMap;
