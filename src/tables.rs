/// Alias tokens that name a grouping rather than a plant.
/// Compared case-insensitively against whole tokens.
pub const STOPWORDS: &[&str] = &[
    "variety", "speckled variety", "various", "hybrid", "var.", "subsp.", "syn.",
    // Spanish
    "variedad", "variedades", "híbrido", "híbrida", "varias", "varios",
    // Simplified Chinese
    "杂交", "品种", "多种",
];

/// Capitalized words that start common names, so "Chinese evergreen" or
/// "String of pearls" is not mistaken for a Latin binomial.
/// Compared case-insensitively.
pub const COMMON_FIRST_WORDS: &[&str] = &[
    // Colors and surfaces
    "black", "green", "red", "grey", "gray", "pink", "silver", "golden", "purple",
    "emerald", "coral", "white", "yellow", "ruby", "violet", "variegated", "speckled",
    "striped", "spotted", "painted", "hoary",
    // Shapes and sizes
    "giant", "compact", "mini", "miniature", "oval", "split", "curly", "broad", "small",
    "large", "great", "lacy", "wavyleaf", "trailing",
    // Places and peoples
    "chinese", "african", "madagascar", "india", "jamaica", "confederate", "cape",
    "natal", "arabian", "brasil", "swiss", "new", "england", "mexican", "english",
    "zanzibar", "amazon", "victoria", "albany", "nagoya",
    // Objects and animals
    "tree", "mirror", "zebra", "moss", "cushion", "corn", "dragon", "song", "false",
    "bamboo", "reed", "cast", "iron", "barroom", "bay", "leopard", "fancy", "arrow",
    "leaf", "angel", "wing", "heart", "elephant", "ear", "taro", "fish", "bone", "hen",
    "chick", "mother", "baby", "ghost", "pearl", "string", "pearls", "banana",
    "dolphin", "burro", "tail", "bleeding", "wax", "jasmine", "trumpet", "primrose",
    "flaming", "katy", "shamrock", "ripple", "plum", "sword", "watermelon", "rabbit",
    "foot", "bird", "nest", "button", "fern", "kangaroo", "paw", "maidenhair",
    "staghorn", "crest", "flame", "pencil", "barrel", "bun", "easter", "lily",
    "christmas", "thanksgiving", "crab", "claw", "moon", "chin", "star", "mistletoe",
    "rainbow", "lady", "slipper", "tongue", "lipstick", "lucky", "coffee", "peacock",
    "cathedral", "window", "medallion", "rattlesnake", "prayer", "nerve", "moselike",
    "cloud", "inch", "wandering", "jew", "spider", "paradise", "juniper", "coleus",
    "croton", "money", "cheese", "polly", "mask", "poppy", "summer", "duck", "garden",
    "lace", "plumosa", "flamingo", "flower", "houseleek", "airplane", "ribbon", "zonal",
    "wine", "fishbone", "arum", "moth", "crane", "gloriosa", "lime", "wild", "elkhorn",
    "turtle", "eternity", "hope", "pachysandra", "impatiens", "lizzie", "yucca",
    "dracaena", "pak", "mosaic", "oyster", "breadfruit", "spiderwort", "blanket",
    "lenten", "pincushion", "bee", "rose", "cider", "night", "ornamental", "bearded",
    "tulip", "devil", "hay", "old", "man",
    // Descriptors
    "medicinal", "sweet", "glossy", "maria", "janet", "craig", "limelight",
    "warneckii", "domino", "sensation", "allusion", "common",
    // Spanish
    "terciopelo", "planta", "espejo", "cobre", "negro", "verde", "máscara", "mascara",
    "reina", "flor", "flamenco", "frijol", "helecho", "palmera", "pluma", "cola",
    "serpiente", "cadena", "perlas", "plátanos", "delfines", "cactus", "navidad",
    "pascua", "nopal", "oreja", "elefante", "azuki", "rojo", "blanco", "azul", "dorado",
    "genovesa", "dulce", "japonesa", "ocupada", "jardín", "inglesa", "europea",
    "manojo", "lengua", "suegra", "listada", "margarita", "enredadera", "tortuga",
    "albahaca", "pimiento", "camelia", "lavanda", "cebolla", "nabo", "pera", "espada",
    "plateada", "amor", "hombre", "rosa",
];

/// Genus names that are scientific even when they stand alone.
pub const KNOWN_GENERA: &[&str] = &[
    "lithops", "phalaenopsis", "graptopetalum", "echeveria", "sedum", "curio",
    "haworthia", "aloe", "crassula", "kalanchoe", "schlumbergera", "epiphyllum",
    "rhipsalis", "mammillaria", "opuntia", "astrophytum", "saintpaulia",
    "streptocarpus", "goeppertia", "maranta", "ficus",
];

/// Glyphs that mark a synonym clause outside the Latin `syn.` form.
pub const SYNONYM_MARKERS: &[&str] = &["同义名", "异名"];

/// Taxonomic rank markers. Entries ending in `.` are abbreviations.
pub const RANK_MARKERS: &[&str] = &["var.", "subsp.", "subspecies", "syn.", "cv.", "×"];

/// Per-locale annotation phrase: (locale code, prefix, terminal punctuation).
pub const AKA_PHRASES: &[(&str, &str, &str)] = &[
    ("en", "Also known as: ", "."),
    ("es", "También conocida como: ", "."),
    ("zh-Hans", "也称：", "。"),
];

/// Locale whose phrase is used for codes missing from the phrase table.
pub const DEFAULT_LOCALE: &str = "en";

/// Records with more segments than this are categories and never annotated.
pub const CATEGORY_SEGMENT_LIMIT: usize = 3;

/// Build a regex fragment matching any rank marker.
/// Sorted by length descending so longer markers match first.
pub fn build_rank_regex(markers: &[String]) -> String {
    let mut all: Vec<&str> = markers.iter().map(String::as_str).collect();
    all.sort_by_key(|m| std::cmp::Reverse(m.chars().count()));
    all.dedup();

    let alts: Vec<String> = all
        .iter()
        .map(|m| {
            let escaped = regex::escape(m);
            // Only anchor at a word start when the marker itself starts with a letter
            if m.chars().next().is_some_and(char::is_alphanumeric) {
                if m.ends_with('.') {
                    format!(r"\b{escaped}")
                } else {
                    format!(r"\b{escaped}\b")
                }
            } else {
                escaped
            }
        })
        .collect();

    format!("(?i)(?:{})", alts.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rank_regex_abbreviations() {
        let re = regex::Regex::new(&build_rank_regex(&owned(RANK_MARKERS))).unwrap();
        assert!(re.is_match("Sansevieria trifasciata var. laurentii"));
        assert!(re.is_match("Aloe vera subsp. barbadensis"));
        assert!(re.is_match("Tillandsia × hybrid"));
        assert!(re.is_match("A subspecies of fern"));
    }

    #[test]
    fn test_rank_regex_word_start_only() {
        let re = regex::Regex::new(&build_rank_regex(&owned(RANK_MARKERS))).unwrap();
        // "var." inside a word is not a marker
        assert!(!re.is_match("Polvar. plant"));
        assert!(!re.is_match("Subspeciesless"));
        assert!(!re.is_match("Snake plant"));
    }

    #[test]
    fn test_phrase_table_has_default() {
        assert!(AKA_PHRASES.iter().any(|(code, _, _)| *code == DEFAULT_LOCALE));
    }
}
