//! Color value shortening.

use phf::phf_map;

/// Hex colors that have a shorter (or equally short, more readable) keyword.
static SHORTER_NAME: phf::Map<&'static str, &'static str> = phf_map! {
    "#000080" => "navy",
    "#008000" => "green",
    "#008080" => "teal",
    "#4b0082" => "indigo",
    "#800000" => "maroon",
    "#800080" => "purple",
    "#808000" => "olive",
    "#808080" => "gray",
    "#a0522d" => "sienna",
    "#a52a2a" => "brown",
    "#c0c0c0" => "silver",
    "#cd853f" => "peru",
    "#d2b48c" => "tan",
    "#da70d6" => "orchid",
    "#dda0dd" => "plum",
    "#ee82ee" => "violet",
    "#f0e68c" => "khaki",
    "#f0ffff" => "azure",
    "#f5deb3" => "wheat",
    "#f5f5dc" => "beige",
    "#fa8072" => "salmon",
    "#faf0e6" => "linen",
    "#ff0000" => "red",
    "#f00" => "red",
    "#ff6347" => "tomato",
    "#ff7f50" => "coral",
    "#ffa500" => "orange",
    "#ffc0cb" => "pink",
    "#ffd700" => "gold",
    "#ffe4c4" => "bisque",
    "#fffafa" => "snow",
    "#fffff0" => "ivory",
};

/// Color keywords that have a shorter hex notation.
static SHORTER_HEX: phf::Map<&'static str, &'static str> = phf_map! {
    "black" => "#000",
    "white" => "#fff",
    "yellow" => "#ff0",
    "fuchsia" => "#f0f",
    "magenta" => "#f0f",
    "aliceblue" => "#f0f8ff",
    "antiquewhite" => "#faebd7",
    "aquamarine" => "#7fffd4",
    "blanchedalmond" => "#ffebcd",
    "blueviolet" => "#8a2be2",
    "burlywood" => "#deb887",
    "cadetblue" => "#5f9ea0",
    "chartreuse" => "#7fff00",
    "chocolate" => "#d2691e",
    "cornflowerblue" => "#6495ed",
    "cornsilk" => "#fff8dc",
    "darkblue" => "#00008b",
    "darkcyan" => "#008b8b",
    "darkgoldenrod" => "#b8860b",
    "darkgray" => "#a9a9a9",
    "darkgreen" => "#006400",
    "darkgrey" => "#a9a9a9",
    "darkkhaki" => "#bdb76b",
    "darkmagenta" => "#8b008b",
    "darkolivegreen" => "#556b2f",
    "darkorange" => "#ff8c00",
    "darkorchid" => "#9932cc",
    "darksalmon" => "#e9967a",
    "darkseagreen" => "#8fbc8f",
    "darkslateblue" => "#483d8b",
    "darkslategray" => "#2f4f4f",
    "darkslategrey" => "#2f4f4f",
    "darkturquoise" => "#00ced1",
    "darkviolet" => "#9400d3",
    "deeppink" => "#ff1493",
    "deepskyblue" => "#00bfff",
    "dodgerblue" => "#1e90ff",
    "firebrick" => "#b22222",
    "floralwhite" => "#fffaf0",
    "forestgreen" => "#228b22",
    "gainsboro" => "#dcdcdc",
    "ghostwhite" => "#f8f8ff",
    "goldenrod" => "#daa520",
    "greenyellow" => "#adff2f",
    "honeydew" => "#f0fff0",
    "indianred" => "#cd5c5c",
    "lavender" => "#e6e6fa",
    "lavenderblush" => "#fff0f5",
    "lawngreen" => "#7cfc00",
    "lemonchiffon" => "#fffacd",
    "lightblue" => "#add8e6",
    "lightcoral" => "#f08080",
    "lightcyan" => "#e0ffff",
    "lightgoldenrodyellow" => "#fafad2",
    "lightgray" => "#d3d3d3",
    "lightgreen" => "#90ee90",
    "lightgrey" => "#d3d3d3",
    "lightpink" => "#ffb6c1",
    "lightsalmon" => "#ffa07a",
    "lightseagreen" => "#20b2aa",
    "lightskyblue" => "#87cefa",
    "lightslategray" => "#789",
    "lightslategrey" => "#789",
    "lightsteelblue" => "#b0c4de",
    "lightyellow" => "#ffffe0",
    "limegreen" => "#32cd32",
    "mediumaquamarine" => "#66cdaa",
    "mediumblue" => "#0000cd",
    "mediumorchid" => "#ba55d3",
    "mediumpurple" => "#9370db",
    "mediumseagreen" => "#3cb371",
    "mediumslateblue" => "#7b68ee",
    "mediumspringgreen" => "#00fa9a",
    "mediumturquoise" => "#48d1cc",
    "mediumvioletred" => "#c71585",
    "midnightblue" => "#191970",
    "mintcream" => "#f5fffa",
    "mistyrose" => "#ffe4e1",
    "moccasin" => "#ffe4b5",
    "navajowhite" => "#ffdead",
    "olivedrab" => "#6b8e23",
    "orangered" => "#ff4500",
    "palegoldenrod" => "#eee8aa",
    "palegreen" => "#98fb98",
    "paleturquoise" => "#afeeee",
    "palevioletred" => "#db7093",
    "papayawhip" => "#ffefd5",
    "peachpuff" => "#ffdab9",
    "powderblue" => "#b0e0e6",
    "rebeccapurple" => "#639",
    "rosybrown" => "#bc8f8f",
    "royalblue" => "#4169e1",
    "saddlebrown" => "#8b4513",
    "sandybrown" => "#f4a460",
    "seagreen" => "#2e8b57",
    "seashell" => "#fff5ee",
    "slateblue" => "#6a5acd",
    "slategray" => "#708090",
    "slategrey" => "#708090",
    "springgreen" => "#00ff7f",
    "steelblue" => "#4682b4",
    "turquoise" => "#40e0d0",
    "whitesmoke" => "#f5f5f5",
    "yellowgreen" => "#9acd32",
};

/// Shorten a color value.
///
/// Hex colors and keywords are lower-cased, `#rrggbb` collapses to `#rgb` when
/// every channel repeats its digit, and a shorter keyword/hex equivalent is
/// substituted when one exists. Functional notations (`rgb()`, `hsl()`, `url()`)
/// and anything else are returned unchanged.
pub fn shorten_color(val: &[u8]) -> Vec<u8> {
    let is_hex = val.first() == Some(&b'#');
    if !is_hex && !val.iter().all(u8::is_ascii_alphabetic) {
        return val.to_vec();
    }

    let lower = val.to_ascii_lowercase();
    let Ok(key) = std::str::from_utf8(&lower) else {
        return val.to_vec();
    };

    if is_hex {
        if let Some(name) = SHORTER_NAME.get(key) {
            return name.as_bytes().to_vec();
        }
        if lower.len() == 7
            && lower[1..].iter().all(u8::is_ascii_hexdigit)
            && lower[1] == lower[2]
            && lower[3] == lower[4]
            && lower[5] == lower[6]
        {
            return vec![b'#', lower[1], lower[3], lower[5]];
        }
    } else if let Some(hex) = SHORTER_HEX.get(key) {
        return hex.as_bytes().to_vec();
    }
    lower
}
