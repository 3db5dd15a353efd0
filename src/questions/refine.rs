// file: src/questions/refine.rs
// description: refine-style left fold over an ordered sequence of chunks
// reference: sequential accumulation with an injected combining step

use crate::error::Result;
use std::future::Future;

/// Folds `chunks` into a single accumulator.
///
/// The first chunk is passed to `initial`; every later chunk is combined with
/// the running accumulator by `refine`. Steps run strictly in order and the
/// first error stops the fold. Returns `None` for an empty sequence.
pub async fn fold_refine<'a, I, F, G, FutI, FutR>(
    chunks: I,
    mut initial: F,
    mut refine: G,
) -> Result<Option<String>>
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut(&'a str) -> FutI,
    FutI: Future<Output = Result<String>>,
    G: FnMut(String, &'a str) -> FutR,
    FutR: Future<Output = Result<String>>,
{
    let mut chunks = chunks.into_iter();

    let Some(first) = chunks.next() else {
        return Ok(None);
    };

    let mut accumulator = initial(first).await?;
    for chunk in chunks {
        accumulator = refine(accumulator, chunk).await?;
    }

    Ok(Some(accumulator))
}
