/*!
 * Geometry-side helpers of the pipeline.
 *
 * - `color`: packed integer colors to normalized RGB and back
 * - `wrap`: greedy word wrapping with shrink-to-fit font sizing
 */

pub mod color;
pub mod wrap;

pub use self::wrap::{fit_text, wrap_words, WrapOptions, WrapResult};
