//! Named character reference lookup table.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//!
//! The full standard defines 2,231 entities; this table carries the common
//! ones plus every legacy semicolon-less form the resolver's compatibility
//! rules depend on. Names are stored WITH their trailing semicolon where one
//! exists, because the resolver matches the longest name including the
//! semicolon (`&not;` and `&notin;` are distinct names, and bare `&not` is a
//! third, legacy, name).

use std::collections::HashMap;
use std::sync::LazyLock;

/// The named character reference table.
/// Maps entity names (without the leading '&') to their replacement strings.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // The core five, with their legacy semicolon-less forms.
    m.insert("amp;", "&");
    m.insert("amp", "&");
    m.insert("AMP;", "&");
    m.insert("AMP", "&");
    m.insert("lt;", "<");
    m.insert("lt", "<");
    m.insert("LT;", "<");
    m.insert("LT", "<");
    m.insert("gt;", ">");
    m.insert("gt", ">");
    m.insert("GT;", ">");
    m.insert("GT", ">");
    m.insert("quot;", "\"");
    m.insert("quot", "\"");
    m.insert("QUOT;", "\"");
    m.insert("QUOT", "\"");
    m.insert("apos;", "'");

    // Latin-1 punctuation and symbols. These all have legacy forms.
    m.insert("nbsp;", "\u{00A0}");
    m.insert("nbsp", "\u{00A0}");
    m.insert("iexcl;", "\u{00A1}");
    m.insert("iexcl", "\u{00A1}");
    m.insert("cent;", "\u{00A2}");
    m.insert("cent", "\u{00A2}");
    m.insert("pound;", "\u{00A3}");
    m.insert("pound", "\u{00A3}");
    m.insert("curren;", "\u{00A4}");
    m.insert("curren", "\u{00A4}");
    m.insert("yen;", "\u{00A5}");
    m.insert("yen", "\u{00A5}");
    m.insert("brvbar;", "\u{00A6}");
    m.insert("brvbar", "\u{00A6}");
    m.insert("sect;", "\u{00A7}");
    m.insert("sect", "\u{00A7}");
    m.insert("uml;", "\u{00A8}");
    m.insert("uml", "\u{00A8}");
    m.insert("copy;", "\u{00A9}");
    m.insert("copy", "\u{00A9}");
    m.insert("COPY;", "\u{00A9}");
    m.insert("COPY", "\u{00A9}");
    m.insert("ordf;", "\u{00AA}");
    m.insert("ordf", "\u{00AA}");
    m.insert("laquo;", "\u{00AB}");
    m.insert("laquo", "\u{00AB}");
    m.insert("not;", "\u{00AC}");
    m.insert("not", "\u{00AC}");
    m.insert("shy;", "\u{00AD}");
    m.insert("shy", "\u{00AD}");
    m.insert("reg;", "\u{00AE}");
    m.insert("reg", "\u{00AE}");
    m.insert("REG;", "\u{00AE}");
    m.insert("REG", "\u{00AE}");
    m.insert("macr;", "\u{00AF}");
    m.insert("macr", "\u{00AF}");
    m.insert("deg;", "\u{00B0}");
    m.insert("deg", "\u{00B0}");
    m.insert("plusmn;", "\u{00B1}");
    m.insert("plusmn", "\u{00B1}");
    m.insert("sup2;", "\u{00B2}");
    m.insert("sup2", "\u{00B2}");
    m.insert("sup3;", "\u{00B3}");
    m.insert("sup3", "\u{00B3}");
    m.insert("acute;", "\u{00B4}");
    m.insert("acute", "\u{00B4}");
    m.insert("micro;", "\u{00B5}");
    m.insert("micro", "\u{00B5}");
    m.insert("para;", "\u{00B6}");
    m.insert("para", "\u{00B6}");
    m.insert("middot;", "\u{00B7}");
    m.insert("middot", "\u{00B7}");
    m.insert("cedil;", "\u{00B8}");
    m.insert("cedil", "\u{00B8}");
    m.insert("sup1;", "\u{00B9}");
    m.insert("sup1", "\u{00B9}");
    m.insert("ordm;", "\u{00BA}");
    m.insert("ordm", "\u{00BA}");
    m.insert("raquo;", "\u{00BB}");
    m.insert("raquo", "\u{00BB}");
    m.insert("frac14;", "\u{00BC}");
    m.insert("frac14", "\u{00BC}");
    m.insert("frac12;", "\u{00BD}");
    m.insert("frac12", "\u{00BD}");
    m.insert("frac34;", "\u{00BE}");
    m.insert("frac34", "\u{00BE}");
    m.insert("iquest;", "\u{00BF}");
    m.insert("iquest", "\u{00BF}");
    m.insert("times;", "\u{00D7}");
    m.insert("times", "\u{00D7}");
    m.insert("divide;", "\u{00F7}");
    m.insert("divide", "\u{00F7}");
    m.insert("szlig;", "\u{00DF}");
    m.insert("szlig", "\u{00DF}");

    // Typography.
    m.insert("trade;", "\u{2122}");
    m.insert("mdash;", "\u{2014}");
    m.insert("ndash;", "\u{2013}");
    m.insert("hellip;", "\u{2026}");
    m.insert("bull;", "\u{2022}");
    m.insert("dagger;", "\u{2020}");
    m.insert("Dagger;", "\u{2021}");
    m.insert("lsquo;", "\u{2018}");
    m.insert("rsquo;", "\u{2019}");
    m.insert("ldquo;", "\u{201C}");
    m.insert("rdquo;", "\u{201D}");
    m.insert("sbquo;", "\u{201A}");
    m.insert("bdquo;", "\u{201E}");
    m.insert("lsaquo;", "\u{2039}");
    m.insert("rsaquo;", "\u{203A}");
    m.insert("permil;", "\u{2030}");
    m.insert("prime;", "\u{2032}");
    m.insert("Prime;", "\u{2033}");
    m.insert("oline;", "\u{203E}");
    m.insert("euro;", "\u{20AC}");

    // Math and logic. The `not` family exercises longest-prefix matching:
    // `&notin;` must not stop at `not`.
    m.insert("ne;", "\u{2260}");
    m.insert("le;", "\u{2264}");
    m.insert("ge;", "\u{2265}");
    m.insert("lowast;", "\u{2217}");
    m.insert("minus;", "\u{2212}");
    m.insert("radic;", "\u{221A}");
    m.insert("prop;", "\u{221D}");
    m.insert("infin;", "\u{221E}");
    m.insert("ang;", "\u{2220}");
    m.insert("and;", "\u{2227}");
    m.insert("or;", "\u{2228}");
    m.insert("cap;", "\u{2229}");
    m.insert("cup;", "\u{222A}");
    m.insert("int;", "\u{222B}");
    m.insert("there4;", "\u{2234}");
    m.insert("sim;", "\u{223C}");
    m.insert("cong;", "\u{2245}");
    m.insert("asymp;", "\u{2248}");
    m.insert("equiv;", "\u{2261}");
    m.insert("sub;", "\u{2282}");
    m.insert("sup;", "\u{2283}");
    m.insert("nsub;", "\u{2284}");
    m.insert("sube;", "\u{2286}");
    m.insert("supe;", "\u{2287}");
    m.insert("isin;", "\u{2208}");
    m.insert("notin;", "\u{2209}");
    m.insert("notinva;", "\u{2209}");
    m.insert("notinvb;", "\u{22F7}");
    m.insert("notinvc;", "\u{22F6}");
    m.insert("notni;", "\u{220C}");
    m.insert("ni;", "\u{220B}");
    m.insert("prod;", "\u{220F}");
    m.insert("sum;", "\u{2211}");
    m.insert("part;", "\u{2202}");
    m.insert("exist;", "\u{2203}");
    m.insert("empty;", "\u{2205}");
    m.insert("nabla;", "\u{2207}");
    m.insert("forall;", "\u{2200}");
    m.insert("oplus;", "\u{2295}");
    m.insert("otimes;", "\u{2297}");
    m.insert("perp;", "\u{22A5}");
    m.insert("sdot;", "\u{22C5}");
    m.insert("lceil;", "\u{2308}");
    m.insert("rceil;", "\u{2309}");
    m.insert("lfloor;", "\u{230A}");
    m.insert("rfloor;", "\u{230B}");
    m.insert("lang;", "\u{27E8}");
    m.insert("rang;", "\u{27E9}");

    // Arrows.
    m.insert("larr;", "\u{2190}");
    m.insert("uarr;", "\u{2191}");
    m.insert("rarr;", "\u{2192}");
    m.insert("darr;", "\u{2193}");
    m.insert("harr;", "\u{2194}");
    m.insert("crarr;", "\u{21B5}");
    m.insert("lArr;", "\u{21D0}");
    m.insert("uArr;", "\u{21D1}");
    m.insert("rArr;", "\u{21D2}");
    m.insert("dArr;", "\u{21D3}");
    m.insert("hArr;", "\u{21D4}");

    // Greek letters.
    m.insert("Alpha;", "\u{0391}");
    m.insert("Beta;", "\u{0392}");
    m.insert("Gamma;", "\u{0393}");
    m.insert("Delta;", "\u{0394}");
    m.insert("Epsilon;", "\u{0395}");
    m.insert("Theta;", "\u{0398}");
    m.insert("Lambda;", "\u{039B}");
    m.insert("Pi;", "\u{03A0}");
    m.insert("Sigma;", "\u{03A3}");
    m.insert("Phi;", "\u{03A6}");
    m.insert("Psi;", "\u{03A8}");
    m.insert("Omega;", "\u{03A9}");
    m.insert("alpha;", "\u{03B1}");
    m.insert("beta;", "\u{03B2}");
    m.insert("gamma;", "\u{03B3}");
    m.insert("delta;", "\u{03B4}");
    m.insert("epsilon;", "\u{03B5}");
    m.insert("zeta;", "\u{03B6}");
    m.insert("eta;", "\u{03B7}");
    m.insert("theta;", "\u{03B8}");
    m.insert("iota;", "\u{03B9}");
    m.insert("kappa;", "\u{03BA}");
    m.insert("lambda;", "\u{03BB}");
    m.insert("mu;", "\u{03BC}");
    m.insert("nu;", "\u{03BD}");
    m.insert("xi;", "\u{03BE}");
    m.insert("omicron;", "\u{03BF}");
    m.insert("pi;", "\u{03C0}");
    m.insert("rho;", "\u{03C1}");
    m.insert("sigmaf;", "\u{03C2}");
    m.insert("sigma;", "\u{03C3}");
    m.insert("tau;", "\u{03C4}");
    m.insert("upsilon;", "\u{03C5}");
    m.insert("phi;", "\u{03C6}");
    m.insert("chi;", "\u{03C7}");
    m.insert("psi;", "\u{03C8}");
    m.insert("omega;", "\u{03C9}");

    // Accented Latin letters, with their legacy forms.
    m.insert("Agrave;", "\u{00C0}");
    m.insert("Agrave", "\u{00C0}");
    m.insert("Aacute;", "\u{00C1}");
    m.insert("Aacute", "\u{00C1}");
    m.insert("Acirc;", "\u{00C2}");
    m.insert("Acirc", "\u{00C2}");
    m.insert("Atilde;", "\u{00C3}");
    m.insert("Atilde", "\u{00C3}");
    m.insert("Auml;", "\u{00C4}");
    m.insert("Auml", "\u{00C4}");
    m.insert("Aring;", "\u{00C5}");
    m.insert("Aring", "\u{00C5}");
    m.insert("AElig;", "\u{00C6}");
    m.insert("AElig", "\u{00C6}");
    m.insert("Ccedil;", "\u{00C7}");
    m.insert("Ccedil", "\u{00C7}");
    m.insert("Egrave;", "\u{00C8}");
    m.insert("Egrave", "\u{00C8}");
    m.insert("Eacute;", "\u{00C9}");
    m.insert("Eacute", "\u{00C9}");
    m.insert("Ecirc;", "\u{00CA}");
    m.insert("Ecirc", "\u{00CA}");
    m.insert("Euml;", "\u{00CB}");
    m.insert("Euml", "\u{00CB}");
    m.insert("Igrave;", "\u{00CC}");
    m.insert("Igrave", "\u{00CC}");
    m.insert("Iacute;", "\u{00CD}");
    m.insert("Iacute", "\u{00CD}");
    m.insert("Icirc;", "\u{00CE}");
    m.insert("Icirc", "\u{00CE}");
    m.insert("Iuml;", "\u{00CF}");
    m.insert("Iuml", "\u{00CF}");
    m.insert("Ntilde;", "\u{00D1}");
    m.insert("Ntilde", "\u{00D1}");
    m.insert("Ograve;", "\u{00D2}");
    m.insert("Ograve", "\u{00D2}");
    m.insert("Oacute;", "\u{00D3}");
    m.insert("Oacute", "\u{00D3}");
    m.insert("Ocirc;", "\u{00D4}");
    m.insert("Ocirc", "\u{00D4}");
    m.insert("Otilde;", "\u{00D5}");
    m.insert("Otilde", "\u{00D5}");
    m.insert("Ouml;", "\u{00D6}");
    m.insert("Ouml", "\u{00D6}");
    m.insert("Oslash;", "\u{00D8}");
    m.insert("Oslash", "\u{00D8}");
    m.insert("Ugrave;", "\u{00D9}");
    m.insert("Ugrave", "\u{00D9}");
    m.insert("Uacute;", "\u{00DA}");
    m.insert("Uacute", "\u{00DA}");
    m.insert("Ucirc;", "\u{00DB}");
    m.insert("Ucirc", "\u{00DB}");
    m.insert("Uuml;", "\u{00DC}");
    m.insert("Uuml", "\u{00DC}");
    m.insert("Yacute;", "\u{00DD}");
    m.insert("Yacute", "\u{00DD}");
    m.insert("agrave;", "\u{00E0}");
    m.insert("agrave", "\u{00E0}");
    m.insert("aacute;", "\u{00E1}");
    m.insert("aacute", "\u{00E1}");
    m.insert("acirc;", "\u{00E2}");
    m.insert("acirc", "\u{00E2}");
    m.insert("atilde;", "\u{00E3}");
    m.insert("atilde", "\u{00E3}");
    m.insert("auml;", "\u{00E4}");
    m.insert("auml", "\u{00E4}");
    m.insert("aring;", "\u{00E5}");
    m.insert("aring", "\u{00E5}");
    m.insert("aelig;", "\u{00E6}");
    m.insert("aelig", "\u{00E6}");
    m.insert("ccedil;", "\u{00E7}");
    m.insert("ccedil", "\u{00E7}");
    m.insert("egrave;", "\u{00E8}");
    m.insert("egrave", "\u{00E8}");
    m.insert("eacute;", "\u{00E9}");
    m.insert("eacute", "\u{00E9}");
    m.insert("ecirc;", "\u{00EA}");
    m.insert("ecirc", "\u{00EA}");
    m.insert("euml;", "\u{00EB}");
    m.insert("euml", "\u{00EB}");
    m.insert("igrave;", "\u{00EC}");
    m.insert("igrave", "\u{00EC}");
    m.insert("iacute;", "\u{00ED}");
    m.insert("iacute", "\u{00ED}");
    m.insert("icirc;", "\u{00EE}");
    m.insert("icirc", "\u{00EE}");
    m.insert("iuml;", "\u{00EF}");
    m.insert("iuml", "\u{00EF}");
    m.insert("ntilde;", "\u{00F1}");
    m.insert("ntilde", "\u{00F1}");
    m.insert("ograve;", "\u{00F2}");
    m.insert("ograve", "\u{00F2}");
    m.insert("oacute;", "\u{00F3}");
    m.insert("oacute", "\u{00F3}");
    m.insert("ocirc;", "\u{00F4}");
    m.insert("ocirc", "\u{00F4}");
    m.insert("otilde;", "\u{00F5}");
    m.insert("otilde", "\u{00F5}");
    m.insert("ouml;", "\u{00F6}");
    m.insert("ouml", "\u{00F6}");
    m.insert("oslash;", "\u{00F8}");
    m.insert("oslash", "\u{00F8}");
    m.insert("ugrave;", "\u{00F9}");
    m.insert("ugrave", "\u{00F9}");
    m.insert("uacute;", "\u{00FA}");
    m.insert("uacute", "\u{00FA}");
    m.insert("ucirc;", "\u{00FB}");
    m.insert("ucirc", "\u{00FB}");
    m.insert("uuml;", "\u{00FC}");
    m.insert("uuml", "\u{00FC}");
    m.insert("yacute;", "\u{00FD}");
    m.insert("yacute", "\u{00FD}");
    m.insert("yuml;", "\u{00FF}");
    m.insert("yuml", "\u{00FF}");
    m.insert("ETH;", "\u{00D0}");
    m.insert("ETH", "\u{00D0}");
    m.insert("eth;", "\u{00F0}");
    m.insert("eth", "\u{00F0}");
    m.insert("THORN;", "\u{00DE}");
    m.insert("THORN", "\u{00DE}");
    m.insert("thorn;", "\u{00FE}");
    m.insert("thorn", "\u{00FE}");

    // Multi-character replacements exist too.
    m.insert("fjlig;", "fj");
    m.insert("NotEqualTilde;", "\u{2242}\u{0338}");

    m
});

/// Entity names grouped by their first scalar, for prefix pruning.
///
/// The resolver starts from this bucket and repeatedly narrows it as it
/// consumes candidate characters, so an `&` followed by a scalar that starts
/// no entity costs one lookup and nothing more.
static ENTITIES_BY_FIRST_CHAR: LazyLock<HashMap<char, Vec<&'static str>>> =
    LazyLock::new(|| {
        let mut buckets: HashMap<char, Vec<&'static str>> = HashMap::new();
        for name in NAMED_ENTITIES.keys() {
            if let Some(first) = name.chars().next() {
                buckets.entry(first).or_default().push(name);
            }
        }
        // Deterministic iteration order for the resolver's pruning loop.
        for bucket in buckets.values_mut() {
            bucket.sort_unstable();
        }
        buckets
    });

/// Look up a named character reference.
///
/// `name` must not include the leading '&'. Legacy semicolon-less names
/// (`amp`, `not`, ...) resolve like any other name.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// All entity names starting with the given scalar, sorted.
#[must_use]
pub fn entities_starting_with(first: char) -> &'static [&'static str] {
    ENTITIES_BY_FIRST_CHAR
        .get(&first)
        .map_or(&[][..], Vec::as_slice)
}
