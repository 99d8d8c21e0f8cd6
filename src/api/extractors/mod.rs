/*!
 * Security context extractor
 *
 * Responsibility:
 * - auth middleware が extensions に入れた SecurityContext を handler に提供する
 */

mod security_context;

pub use security_context::SecurityContextExtractor;
