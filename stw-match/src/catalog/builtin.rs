// Built-in StyleTwin lookup tables
//
// Keys and values are lower-case. Table order is significant only for the
// music table, whose key order drives genre detection.

use super::{LookupTable, StyleCatalog};
use std::collections::HashMap;

/// Helper macro for building an ordered lookup table
macro_rules! table {
    ($($key:expr => [$($val:expr),* $(,)?]),* $(,)?) => {{
        LookupTable::from_entries(vec![
            $(($key, vec![$($val),*]),)*
        ])
    }};
}

pub(super) fn catalog() -> StyleCatalog {
    let genres = ["comedy", "horror", "romance", "action", "animation", "crime", "sci-fi", "drama"]
        .iter()
        .map(|g| g.to_string())
        .collect();

    let tmdb_genres: HashMap<u32, String> = [
        (28, "action"),
        (35, "comedy"),
        (18, "drama"),
        (10749, "romance"),
        (27, "horror"),
        (16, "animation"),
        (878, "sci-fi"),
        (80, "crime"),
    ]
    .into_iter()
    .map(|(id, name)| (id, name.to_string()))
    .collect();

    let genre_tags = table! {
        "comedy"    => ["quirky", "heartwarming", "nostalgic"],
        "horror"    => ["dark", "intense", "surreal"],
        "romance"   => ["romantic", "elegant", "whimsical"],
        "sci-fi"    => ["futuristic", "surreal", "dramatic"],
        "drama"     => ["emotional", "elegant", "nostalgic"],
        "action"    => ["gritty", "rebellious", "intense"],
        "animation" => ["whimsical", "quirky", "nostalgic"],
        "crime"     => ["gritty", "dark", "minimalist"],
    };

    let music_tags = table! {
        "pop"        => ["quirky", "whimsical"],
        "rock"       => ["gritty", "rebellious"],
        "electronic" => ["futuristic", "edgy"],
        "jazz"       => ["elegant", "nostalgic"],
        "classical"  => ["elegant", "minimalist"],
        "hip-hop"    => ["streetwear", "edgy"],
    };

    let tag_styles = table! {
        "quirky"       => ["indie", "retro", "normcore"],
        "romantic"     => ["cottagecore", "vintage", "soft girl"],
        "gritty"       => ["grunge", "punk", "utilitarian"],
        "futuristic"   => ["techwear", "cyberpunk"],
        "dark"         => ["gothic", "alt", "emo"],
        "elegant"      => ["classic", "preppy", "minimalist"],
        "rebellious"   => ["punk", "streetwear", "biker"],
        "heartwarming" => ["softcore", "cozy", "vintage"],
        "whimsical"    => ["fairycore", "boho", "eclectic"],
        "minimalist"   => ["scandi", "normcore", "clean girl"],
        "dramatic"     => ["avant-garde", "glam", "maximalist"],
        "nostalgic"    => ["retro", "vintage", "90s-core"],
        "intense"      => ["military", "dark academia", "utilitarian"],
        "surreal"      => ["artcore", "experimental", "conceptual"],
        "edgy"         => ["streetwear", "alt", "y2k"],
    };

    let style_brands = table! {
        "indie"         => ["Urban Outfitters", "Monki", "Lazy Oaf"],
        "retro"         => ["Beyond Retro", "Levi's", "Dickies"],
        "normcore"      => ["Uniqlo", "Everlane", "Muji"],
        "cottagecore"   => ["Doen", "Christy Dawn", "Reformation"],
        "vintage"       => ["Depop", "Thrifted", "Rokit"],
        "soft girl"     => ["Brandy Melville", "YesStyle", "Princess Polly"],
        "grunge"        => ["Killstar", "Disturbia", "Hot Topic"],
        "punk"          => ["Tripp NYC", "Punk Rave", "AllSaints"],
        "techwear"      => ["Acronym", "Nike ISPA", "Guerrilla Group"],
        "cyberpunk"     => ["Demobaza", "Y-3", "Rick Owens"],
        "gothic"        => ["Killstar", "The Black Angel", "Punk Rave"],
        "classic"       => ["Ralph Lauren", "J.Crew", "Brooks Brothers"],
        "preppy"        => ["Tommy Hilfiger", "GANT", "Lacoste"],
        "minimalist"    => ["COS", "Everlane", "Arket"],
        "streetwear"    => ["Supreme", "Stüssy", "Palace"],
        "boho"          => ["Anthropologie", "Spell", "Free People"],
        "fairycore"     => ["Selkie", "For Love & Lemons", "Free People"],
        "scandi"        => ["Arket", "Weekday", "COS"],
        "clean girl"    => ["Skims", "Aritzia", "Zara"],
        "avant-garde"   => ["Comme des Garçons", "Maison Margiela", "Rick Owens"],
        "glam"          => ["House of CB", "Revolve", "PrettyLittleThing"],
        "maximalist"    => ["Desigual", "Moschino", "The Attico"],
        "90s-core"      => ["Tommy Jeans", "Fila", "Champion"],
        "dark academia" => ["Massimo Dutti", "Ralph Lauren", "Zara"],
    };

    let search_terms: HashMap<String, String> = [
        ("indie", "indie aesthetic outfit"),
        ("retro", "retro fashion look"),
        ("grunge", "grunge style clothing"),
        ("punk", "punk outfit fashion"),
        ("minimalist", "minimalist outfit woman"),
        ("techwear", "techwear fashion look"),
        ("cottagecore", "cottagecore outfit"),
        ("fairycore", "fairycore aesthetic clothes"),
        ("cyberpunk", "cyberpunk style clothes"),
        ("soft girl", "soft girl outfit aesthetic"),
        ("streetwear", "streetwear fashion"),
        ("clean girl", "clean girl fashion"),
        ("gothic", "gothic outfit"),
        ("boho", "boho fashion woman"),
        ("vintage", "vintage aesthetic look"),
        ("dark academia", "dark academia outfit"),
        ("avant-garde", "avant-garde fashion"),
        ("90s-core", "90s aesthetic outfit"),
        ("maximalist", "colorful maximalist fashion"),
        ("classic", "classic elegant fashion"),
        ("preppy", "preppy outfit aesthetic"),
        ("normcore", "normcore fashion"),
        ("utilitarian", "utilitarian outfit"),
        ("alt", "alt fashion look"),
        ("emo", "emo aesthetic outfit"),
        ("softcore", "softcore aesthetic clothes"),
        ("cozy", "cozy aesthetic fashion"),
        ("eclectic", "eclectic fashion look"),
        ("biker", "biker outfit aesthetic"),
        ("scandi", "scandi fashion"),
        ("y2k", "y2k fashion"),
        ("artcore", "artcore fashion"),
        ("experimental", "experimental outfit"),
        ("conceptual", "conceptual fashion"),
    ]
    .into_iter()
    .map(|(style, phrase)| (style.to_string(), phrase.to_string()))
    .collect();

    StyleCatalog {
        genres,
        tmdb_genres,
        genre_tags,
        music_tags,
        tag_styles,
        style_brands,
        search_terms,
    }
}
