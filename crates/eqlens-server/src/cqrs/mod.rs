//! Mediator wiring for dataset commands and queries
//!
//! Routes call each `handle` function directly; the mediator gives other
//! in-process callers one dispatch point over the same handlers.

pub use mediator::DefaultAsyncMediator;

use crate::repository::SharedRepository;

pub mod middleware;

pub type AppMediator = DefaultAsyncMediator;

pub fn build_mediator(repo: SharedRepository) -> AppMediator {
    DefaultAsyncMediator::builder()
        // Datasets
        .add_handler({
            let repo = repo.clone();
            move |cmd| {
                let repo = repo.clone();
                async move { crate::features::datasets::commands::upload::handle(repo, cmd).await }
            }
        })
        .add_handler({
            let repo = repo.clone();
            move |cmd| {
                let repo = repo.clone();
                async move { crate::features::datasets::commands::delete::handle(repo, cmd).await }
            }
        })
        .add_handler({
            let repo = repo.clone();
            move |query| {
                let repo = repo.clone();
                async move { crate::features::datasets::queries::list::handle(repo, query).await }
            }
        })
        .add_handler({
            let repo = repo.clone();
            move |query| {
                let repo = repo.clone();
                async move { crate::features::datasets::queries::get::handle(repo, query).await }
            }
        })
        .add_handler({
            let repo = repo.clone();
            move |query| {
                let repo = repo.clone();
                async move { crate::features::datasets::queries::distribution::handle(repo, query).await }
            }
        })
        .add_handler({
            let repo = repo.clone();
            move |query| {
                let repo = repo.clone();
                async move { crate::features::datasets::queries::raw::handle(repo, query).await }
            }
        })
        .add_handler({
            let repo = repo.clone();
            move |query| {
                let repo = repo.clone();
                async move { crate::features::datasets::queries::charts::handle(repo, query).await }
            }
        })
        .add_handler({
            let repo = repo.clone();
            move |query| {
                let repo = repo.clone();
                async move {
                    crate::features::datasets::queries::equipment_chart::handle(repo, query).await
                }
            }
        })
        .add_handler({
            let repo = repo.clone();
            move |query| {
                let repo = repo.clone();
                async move { crate::features::datasets::queries::report::handle(repo, query).await }
            }
        })
        // Profile
        .add_handler({
            let repo = repo.clone();
            move |query| {
                let repo = repo.clone();
                async move { crate::features::profile::queries::get::handle(repo, query).await }
            }
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::memory_repo;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_mediator_builds() {
        let _mediator = build_mediator(memory_repo());
    }
}
