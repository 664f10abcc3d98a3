/// Associations to load together with a movie.
///
/// Genres are cheap and almost always wanted; ratings can be large and are
/// only needed where an average is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovieRelations {
    pub genres: bool,
    pub ratings: bool,
}

impl MovieRelations {
    /// Bare movie row.
    pub const NONE: Self = Self {
        genres: false,
        ratings: false,
    };

    pub const GENRES: Self = Self {
        genres: true,
        ratings: false,
    };

    /// Genres and ratings.
    pub const ALL: Self = Self {
        genres: true,
        ratings: true,
    };
}
