use std::sync::LazyLock;

use rand::Rng;

use crate::features::PoeticFeatures;
use crate::fractal::FractalPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Cosmic,
    Chaos,
    Beauty,
    Nature,
    Emotion,
    Movement,
    Time,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Cosmic,
        Category::Chaos,
        Category::Beauty,
        Category::Nature,
        Category::Emotion,
        Category::Movement,
        Category::Time,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Cosmic => "cosmic",
            Category::Chaos => "chaos",
            Category::Beauty => "beauty",
            Category::Nature => "nature",
            Category::Emotion => "emotion",
            Category::Movement => "movement",
            Category::Time => "time",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn words(&self) -> &'static [&'static str] {
        match self {
            Category::Cosmic => &["infinite", "eternal", "boundless", "celestial", "astral", "cosmic"],
            Category::Chaos => &["turbulent", "chaotic", "swirling", "spiraling", "dancing", "writhing"],
            Category::Beauty => &["beautiful", "elegant", "sublime", "graceful", "delicate", "intricate"],
            Category::Nature => &["river", "mountain", "ocean", "forest", "wind", "storm", "dawn", "twilight"],
            Category::Emotion => &["yearning", "wonder", "mystery", "passion", "serenity", "melancholy"],
            Category::Movement => &["flows", "cascades", "spirals", "unfolds", "emerges", "transforms"],
            Category::Time => &["moment", "eternity", "instant", "forever", "cycle", "rhythm"],
        }
    }
}

pub const TEMPLATE_SOURCES: &[&str] = &[
    "In {cosmic} {nature}, {emotion} {movement}",
    "Where {chaos} patterns {movement}, {beauty} forms emerge",
    "Through {time}'s {cosmic} dance, {nature} {emotion} flows",
    "{beauty} {chaos} in {cosmic} {nature}, {emotion} without end",
    "As {nature} {movement} through {time}, {beauty} {chaos} awakens",
];

#[derive(Clone, Debug, PartialEq)]
enum Segment {
    Text(&'static str),
    Slot(Category),
}

#[derive(Clone, Debug)]
pub struct Template {
    segments: Vec<Segment>,
    /// Category named by the first brace group, if that group is a category.
    lead: Option<Category>,
}

impl Template {
    /// Split a source string into literal text and `{category}` slots.
    /// Braces that do not name a category stay literal.
    fn parse(source: &'static str) -> Template {
        let mut segments = Vec::new();
        let mut lead = None;
        let mut seen_brace = false;
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|c| open + c) else { break };
            let named = Category::from_name(&rest[open + 1..close]);
            if !seen_brace {
                lead = named;
                seen_brace = true;
            }
            match named {
                Some(category) => {
                    if open > 0 {
                        segments.push(Segment::Text(&rest[..open]));
                    }
                    segments.push(Segment::Slot(category));
                }
                None => segments.push(Segment::Text(&rest[..=close])),
            }
            rest = &rest[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest));
        }

        Template { segments, lead }
    }

    /// The category whose word is capitalized in this template.
    pub fn first_slot(&self) -> Option<Category> {
        self.lead
    }

    pub fn slots(&self) -> impl Iterator<Item = Category> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(c) => Some(*c),
            Segment::Text(_) => None,
        })
    }

    fn fill(&self, features: &PoeticFeatures) -> String {
        let capitalized = self.first_slot();
        let mut line = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => line.push_str(t),
                Segment::Slot(category) => {
                    let word = select_word(*category, features);
                    if Some(*category) == capitalized {
                        line.push_str(&capitalize(word));
                    } else {
                        line.push_str(word);
                    }
                }
            }
        }
        line
    }
}

pub static TEMPLATES: LazyLock<Vec<Template>> =
    LazyLock::new(|| TEMPLATE_SOURCES.iter().copied().map(Template::parse).collect());

/// Index into a category's word list, biased by the point's features.
pub fn select_index(category: Category, features: &PoeticFeatures, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let scaled = |v: f64| (v * len as f64).floor() as usize % len;

    if category == Category::Chaos && features.chaos > 0.5 {
        scaled(features.intensity)
    } else if category == Category::Cosmic && features.complexity > 0.7 {
        scaled(features.rhythm)
    } else {
        scaled(features.complexity + features.intensity)
    }
}

pub fn select_word(category: Category, features: &PoeticFeatures) -> &'static str {
    let words = category.words();
    words[select_index(category, features, words.len())]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// One line of verse for one point; the template is drawn from `rng`.
pub fn compose_line<R: Rng + ?Sized>(point: &FractalPoint, rng: &mut R) -> String {
    let template = &TEMPLATES[rng.gen_range(0..TEMPLATES.len())];
    template.fill(&point.features())
}

/// One line per point, headed by `# title` and a blank line when a non-empty
/// title is given.
pub fn compose<R: Rng + ?Sized>(points: &[FractalPoint], title: Option<&str>, rng: &mut R) -> String {
    let lines: Vec<String> = points.iter().map(|p| compose_line(p, rng)).collect();

    let mut poem = match title {
        Some(t) if !t.is_empty() => format!("# {}\n\n", t),
        _ => String::new(),
    };
    poem.push_str(&lines.join("\n"));
    poem
}
