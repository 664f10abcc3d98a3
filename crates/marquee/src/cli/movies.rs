use chrono::NaiveDate;
use serde_json::json;

use marquee_core::catalog::{
    CreateMovieRequest, MovieFilter, SortField, SortOrder, UpdateMovieRequest,
    DEFAULT_PAGE_LIMIT,
};

use super::Global;
use crate::state::AppState;

#[derive(Debug, clap::Parser)]
pub struct MoviesCommand {
    #[command(subcommand)]
    pub action: MoviesAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum MoviesAction {
    /// List one page of movies
    List(ListArgs),

    /// Show a movie with its genres, ratings and average rating
    Get { id: i64 },

    /// Add a movie
    Create(CreateArgs),

    /// Change some fields of a movie
    Update(UpdateArgs),

    /// Delete a movie with its ratings and watchlist entries
    Delete { id: i64 },
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Movies per page
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    pub limit: u32,

    /// Case-insensitive title substring
    #[arg(long)]
    pub search: Option<String>,

    /// Genre id; repeat to match any of several
    #[arg(long = "genre", value_name = "ID")]
    pub genre_ids: Vec<i64>,

    /// title, releaseDate, voteAverage or popularity
    #[arg(long, default_value = "popularity")]
    pub sort_by: SortField,

    /// asc or desc
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,
}

impl ListArgs {
    pub fn filter(&self) -> MovieFilter {
        let filter = MovieFilter::default()
            .with_page(self.page)
            .with_limit(self.limit)
            .with_genre_ids(self.genre_ids.iter().copied())
            .sorted_by(self.sort_by, self.order);
        match &self.search {
            Some(search) => filter.with_search(search.clone()),
            None => filter,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct CreateArgs {
    /// Provider-assigned movie id
    pub id: i64,

    pub title: String,

    #[arg(long)]
    pub overview: Option<String>,

    /// Release date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub release_date: Option<NaiveDate>,

    #[arg(long)]
    pub popularity: Option<f64>,

    #[arg(long)]
    pub vote_average: Option<f64>,

    #[arg(long)]
    pub vote_count: Option<i64>,

    #[arg(long)]
    pub original_language: Option<String>,

    /// Genre id; unknown ids are ignored
    #[arg(long = "genre", value_name = "ID")]
    pub genre_ids: Vec<i64>,
}

impl From<CreateArgs> for CreateMovieRequest {
    fn from(args: CreateArgs) -> Self {
        let mut request =
            CreateMovieRequest::new(args.id, args.title).with_genre_ids(args.genre_ids);
        request.overview = args.overview;
        request.release_date = args.release_date;
        request.popularity = args.popularity;
        request.vote_average = args.vote_average;
        request.vote_count = args.vote_count;
        request.original_language = args.original_language;
        request
    }
}

#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
    pub id: i64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub overview: Option<String>,

    /// Release date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub release_date: Option<NaiveDate>,

    #[arg(long)]
    pub popularity: Option<f64>,

    #[arg(long)]
    pub vote_average: Option<f64>,

    /// Replaces the genre set; repeat for several
    #[arg(long = "genre", value_name = "ID")]
    pub genre_ids: Vec<i64>,
}

impl UpdateArgs {
    fn into_request(self) -> (i64, UpdateMovieRequest) {
        let update = UpdateMovieRequest {
            title: self.title,
            overview: self.overview,
            release_date: self.release_date,
            popularity: self.popularity,
            vote_average: self.vote_average,
            genre_ids: Some(self.genre_ids).filter(|ids| !ids.is_empty()),
            ..Default::default()
        };
        (self.id, update)
    }
}

pub async fn run(cmd: MoviesCommand, state: &AppState, global: &Global) -> anyhow::Result<()> {
    match cmd.action {
        MoviesAction::List(args) => {
            global.format.print(&state.catalog.list_movies(&args.filter()).await?)
        }
        MoviesAction::Get { id } => global.format.print(&state.catalog.get_movie(id).await?),
        MoviesAction::Create(args) => {
            let movie = state.catalog.create_movie(args.into()).await?;
            global.format.print(&movie)
        }
        MoviesAction::Update(args) => {
            let (id, update) = args.into_request();
            global.format.print(&state.catalog.update_movie(id, update).await?)
        }
        MoviesAction::Delete { id } => {
            state.catalog.delete_movie(id).await?;
            global.format.print(&json!({ "deleted": true, "movieId": id }))
        }
    }
}
