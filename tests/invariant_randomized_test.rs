use mathdown::converter::TYPESET_DIRECTIVE;

#[derive(Debug, Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn next_below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }
}

const TEXT_FRAGMENTS: &[&str] = &[
    "word", "*", "**", "(", ")", "[1]", "[note]", "- ", "> ", "# ", "\n", "\n\n", "text",
];

/// Math fragments and how each must appear after restitution.
const MATH_FRAGMENTS: &[(&str, &str)] = &[
    ("$a_{i}$", "$a_{i}$"),
    ("$$\\sum x * y$$", "$$\\\\sum x * y$$"),
    (
        "\\begin{align}x &= (1)\\end{align}",
        "$$\\\\begin{align*}x &= (1)\\\\end{align*}$$",
    ),
    (
        "\\begin{cases}a & [2]\\end{cases}",
        "$$\\\\begin{cases}a & [2]\\\\end{cases}$$",
    ),
    (
        "$$f = \\begin{cases}a\\end{cases}$$",
        "$$f = \\\\begin{cases}a\\\\end{cases}$$",
    ),
    (
        "$\\begin{pmatrix}b\\end{pmatrix}$",
        "$\\\\begin{pmatrix}b\\\\end{pmatrix}$",
    ),
];

fn generate(rng: &mut Lcg) -> (String, Vec<usize>) {
    let mut parts = Vec::new();
    let mut math = Vec::new();
    let len = 4 + rng.next_below(24);

    for _ in 0..len {
        if rng.next_below(4) == 0 {
            let index = rng.next_below(MATH_FRAGMENTS.len() as u64) as usize;
            parts.push(MATH_FRAGMENTS[index].0.to_string());
            math.push(index);
        } else {
            parts.push(rng.pick(TEXT_FRAGMENTS).to_string());
        }
    }

    (parts.join(" "), math)
}

#[test]
fn randomized_math_restitution_invariants() {
    let mut rng = Lcg::new(0x4D41_5448_2026_1014);
    let iterations = 200;

    for i in 0..iterations {
        let (markup, math) = generate(&mut rng);
        let html = mathdown::render(&markup);

        assert!(
            !html.contains('\u{E000}') && !html.contains('\u{E001}'),
            "iteration {i}: placeholder leaked for {markup:?}"
        );
        assert_eq!(
            html.ends_with(TYPESET_DIRECTIVE),
            !math.is_empty(),
            "iteration {i}: directive mismatch for {markup:?}"
        );

        for (index, (_, restored)) in MATH_FRAGMENTS.iter().enumerate() {
            let expected = math.iter().filter(|&&m| m == index).count();
            assert_eq!(
                html.matches(restored).count(),
                expected,
                "iteration {i}: fragment {index} count for {markup:?}"
            );
        }
    }
}

/// List and blockquote tags in document order.
fn wrapper_tags(html: &str) -> Vec<&'static str> {
    let mut tags = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        rest = &rest[start..];
        if let Some(tag) = ["<ul>", "</ul>", "<blockquote>", "</blockquote>"]
            .into_iter()
            .find(|tag| rest.starts_with(*tag))
        {
            tags.push(tag);
        }
        rest = &rest[1..];
    }
    tags
}

#[test]
fn randomized_wrapper_balance_invariants() {
    let mut rng = Lcg::new(0x0B10_C0DE);

    for i in 0..200 {
        let (markup, _) = generate(&mut rng);
        let html = mathdown::render(&markup);

        assert_eq!(
            html.matches("<ul>").count(),
            html.matches("</ul>").count(),
            "iteration {i}: list wrappers unbalanced for {markup:?}"
        );
        assert_eq!(
            html.matches("<blockquote>").count(),
            html.matches("</blockquote>").count(),
            "iteration {i}: blockquote wrappers unbalanced for {markup:?}"
        );
        let tags = wrapper_tags(&html);
        assert_eq!(tags.len() % 2, 0, "iteration {i}: odd wrapper tags for {markup:?}");
        for pair in tags.chunks(2) {
            assert!(
                pair == ["<ul>", "</ul>"] || pair == ["<blockquote>", "</blockquote>"],
                "iteration {i}: nested wrappers {pair:?} for {markup:?}"
            );
        }
    }
}
