//! Ordered extraction cascades
//!
//! A cascade is a list of independent stages run by one driver loop: the
//! first stage producing an accepted value wins. A stage returns
//! `Ok(Some(_))` with a candidate, `Ok(None)` when its signal is absent, or
//! `Err(_)` when its signal is present but unusable. Errors and rejected
//! candidates are logged and the next stage runs; only exhausting every
//! stage is an error.

use std::fmt::Debug;

use tracing::{debug, warn};

use crate::error::{Error, Field, Result};
use crate::fetch::Page;
use crate::sites::Site;

/// One extraction attempt against a fetched page
pub struct Stage<S, T> {
    pub name: &'static str,
    pub run: fn(&S, &Page) -> Result<Option<T>>,
}

/// Run `stages` in order against `page`, returning the first candidate
/// `accept` approves.
///
/// Fails with [`Error::NotFound`] for `site`/`field` (carrying `hint`) once
/// every stage is exhausted.
pub fn run_cascade<S, T: Debug>(
    strategy: &S,
    page: &Page,
    site: Site,
    field: Field,
    stages: &[Stage<S, T>],
    accept: impl Fn(&T) -> bool,
    hint: Option<&'static str>,
) -> Result<T> {
    for stage in stages {
        match (stage.run)(strategy, page) {
            Ok(Some(candidate)) if accept(&candidate) => {
                debug!(%site, %field, stage = stage.name, ?candidate, "stage matched");
                return Ok(candidate);
            }
            Ok(Some(candidate)) => {
                debug!(%site, %field, stage = stage.name, ?candidate, "candidate rejected");
            }
            Ok(None) => {
                debug!(%site, %field, stage = stage.name, "no candidate");
            }
            Err(e) => {
                debug!(%site, %field, stage = stage.name, error = %e, "stage failed");
            }
        }
    }

    warn!(%site, %field, url = %page.url, stages = stages.len(), "all extraction stages exhausted");
    Err(Error::NotFound { site, field, hint })
}
