use std::cell::RefCell;
use std::path::{Path, PathBuf};

use make_supplementary::config::{Comparison, CropRect, Document};
use make_supplementary::imaging::{CropJob, ImageService};
use make_supplementary::supplementary::{ComparisonPosition, render_comparison};
use make_supplementary::{
    ConfigError, GenerateError, GenerateOptions, ImagingError, Supplementary, generate,
};

/// Reports a fixed size for every image and records what it was asked to do.
struct FakeImages {
    size: (u32, u32),
    sized: RefCell<Vec<PathBuf>>,
    cropped: RefCell<Vec<(PathBuf, Vec<CropJob>)>>,
}

impl FakeImages {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            sized: RefCell::new(Vec::new()),
            cropped: RefCell::new(Vec::new()),
        }
    }
}

impl ImageService for FakeImages {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ImagingError> {
        self.sized.borrow_mut().push(path.to_path_buf());
        Ok(self.size)
    }

    fn crop(&self, source: &Path, jobs: &[CropJob]) -> Result<(), ImagingError> {
        self.cropped
            .borrow_mut()
            .push((source.to_path_buf(), jobs.to_vec()));
        Ok(())
    }
}

fn comparison_json(caption: &str, inputs: &[&str], labels: &[&str], crops: &str) -> String {
    let quote = |items: &[&str]| {
        items
            .iter()
            .map(|s| format!("\"{s}\""))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        r#"{{
            "caption": "{caption}",
            "inputs": [{}],
            "labels": [{}],
            "fig_width_relative": 0.8,
            "crops_height_in": 1.5,
            "crops": {crops}
        }}"#,
        quote(inputs),
        quote(labels)
    )
}

fn document_json(anonymous: bool, people: &str, comparisons: &[String]) -> String {
    format!(
        r#"{{
            "packages": ["subcaption"],
            "title": "Seeing Clearly",
            "links_color": "255,0,0",
            "instructions": "Click a label to jump to that result.",
            "anonymous": {anonymous},
            {people}
            "comparisons": [{}]
        }}"#,
        comparisons.join(", ")
    )
}

const TWO_AUTHORS: &str = r#"
    "authors": [
        {"name": "Ada Lovelace", "institution_id": [1, 2]},
        {"name": "Alan Turing", "institution_id": [2]}
    ],
    "institutions": ["Analytical Engines Inc.", "Bletchley Park"],
"#;

fn parse(json: &str) -> Document {
    json.parse().expect("test config should be valid")
}

fn render_all(doc: &Document, images: &FakeImages) -> Supplementary {
    generate(doc, images, &GenerateOptions::default()).expect("generation succeeds")
}

#[test]
fn two_inputs_without_crops() {
    let doc = parse(&document_json(
        true,
        "",
        &[comparison_json(
            "Denoising",
            &["res/ours.png", "res/base.png"],
            &["Ours", "Baseline"],
            "[]",
        )],
    ));
    let images = FakeImages::new(100, 100);
    let out = generate(&doc, &images, &GenerateOptions::default()).expect("generation succeeds");
    let tex = out.tex.render();

    assert_eq!(out.figures, 2);
    assert_eq!(out.comparisons, 1);
    assert!(images.sized.borrow().is_empty(), "no crops, no size lookups");
    assert!(images.cropped.borrow().is_empty());

    let ours = tex
        .find("\\frame{\\includegraphics[width=0.8\\textwidth]{res/ours.png}}")
        .expect("first image");
    let base = tex
        .find("\\frame{\\includegraphics[width=0.8\\textwidth]{res/base.png}}")
        .expect("second image");
    assert!(ours < base);
    assert_eq!(tex.matches("\\begin{figure*}[h!]").count(), 2);
    assert_eq!(tex.matches("\\huge{Ours}").count(), 1);
    assert_eq!(tex.matches("\\huge{Baseline}").count(), 1);

    // Both pages carry a navigation block linking to both figures.
    assert_eq!(tex.matches("\\hyperlink{fig:0}{\\Large{Ours}}").count(), 2);
    assert_eq!(tex.matches("\\hyperlink{fig:1}{\\Large{Baseline}}").count(), 2);
    assert!(tex.contains("\\caption{Denoising}\\hypertarget{fig:0}{}"));
    assert!(tex.contains("\\caption{Denoising}\\hypertarget{fig:1}{}"));

    // Label of each page comes after its figure and before the next page.
    let first_label = tex.find("\\huge{Ours}").expect("label");
    assert!(ours < first_label && first_label < base);
}

#[test]
fn each_image_gets_its_own_page() {
    let doc = parse(&document_json(
        true,
        "",
        &[comparison_json("A", &["a/1.png", "a/2.png", "a/3.png"], &["1", "2", "3"], "[]")],
    ));
    let out = render_all(&doc, &FakeImages::new(10, 10));

    let tex = out.tex.render();
    let pages: Vec<&str> = tex
        .split("\\clearpage")
        .filter(|chunk| chunk.contains("\\begin{figure*}"))
        .collect();
    assert_eq!(pages.len(), 3);
    assert!(pages.iter().all(|page| page.matches("\\includegraphics").count() == 1));
}

#[test]
fn figure_counter_runs_across_comparisons() {
    let doc = parse(&document_json(
        true,
        "",
        &[
            comparison_json("A", &["a/1.png", "a/2.png"], &["1", "2"], "[]"),
            comparison_json(
                "B",
                &["b/1.png", "b/2.png", "b/3.png"],
                &["1", "2", "3"],
                "[[0, 0, 5, 5]]",
            ),
            comparison_json("C", &["c/1.png"], &["1"], "null"),
        ],
    ));
    let out = render_all(&doc, &FakeImages::new(10, 10));
    let tex = out.tex.render();

    assert_eq!(out.figures, 6);
    let mut last = 0;
    for id in 0..6 {
        let anchor = format!("\\hypertarget{{fig:{id}}}{{}}");
        assert_eq!(tex.matches(&anchor).count(), 1, "{anchor} appears once");
        let at = tex.find(&anchor).expect("anchor present");
        assert!(at >= last, "anchors in document order");
        last = at;
    }
    assert!(!tex.contains("fig:6"));

    // Second comparison's labels point at its own figures.
    assert!(tex.contains("\\hyperlink{fig:2}{\\Large{1}}"));
    assert!(tex.contains("\\hyperlink{fig:4}{\\Large{3}}"));
}

#[test]
fn comparison_anchors_and_navigation() {
    let doc = parse(&document_json(
        true,
        "",
        &[
            comparison_json("A", &["a/1.png"], &["1"], "[]"),
            comparison_json("B", &["b/1.png"], &["1"], "[]"),
        ],
    ));
    let out = render_all(&doc, &FakeImages::new(10, 10));
    let tex = out.tex.render();

    assert_eq!(tex.matches("%%%%%%%%%%%%% New Comparison %%%%%%%%%%%%%").count(), 2);
    assert!(tex.contains("\\hypertarget{comparison:0}{}"));
    assert!(tex.contains("\\hypertarget{comparison:1}{}"));
    assert!(tex.contains("\\hyperlink{comparison:1}{Next Comparison $\\rightarrow$}"));
    assert!(tex.contains("\\hyperlink{comparison:0}{$\\leftarrow$ Previous Comparison}"));
    // Neither a link back from the first nor a dangling link past the last.
    assert!(!tex.contains("comparison:2"));
    assert_eq!(tex.matches("\\textcolor{white}").count(), 2);
}

#[test]
fn single_crop_on_square_image() {
    let doc = parse(&document_json(
        true,
        "",
        &[comparison_json("Zoom", &["scene/ours.png"], &["Ours"], "[[10, 10, 50, 50]]")],
    ));
    let images = FakeImages::new(100, 100);
    let out = generate(&doc, &images, &GenerateOptions::default()).expect("generation succeeds");
    let tex = out.tex.render();

    assert!(tex.contains("\\sbox\\mybox{\\includegraphics[width=0.8\\textwidth]{scene/ours.png}}"));
    assert!(tex.contains("\\begin{tikzpicture}[x=\\wd\\mybox/100, y=\\ht\\mybox/100]"));
    assert_eq!(
        tex.matches("\\draw[blue, ultra thick, rounded corners]").count(),
        1
    );
    assert!(tex.contains("\\draw[blue, ultra thick, rounded corners] (10,50) rectangle (50,90);"));
    assert!(tex.contains("\\draw[black,thin] (0,0) rectangle + (100,100);"));
    assert_eq!(
        tex.matches("\\frame{\\includegraphics[height=1.5in]{scene/crops/ours_crop_0.png}}\\hfil")
            .count(),
        1
    );

    let cropped = images.cropped.borrow();
    assert_eq!(cropped.len(), 1);
    assert_eq!(cropped[0].0, PathBuf::from("scene/ours.png"));
    assert_eq!(
        cropped[0].1,
        vec![CropJob {
            rect: CropRect::new(10, 10, 50, 50),
            dest: PathBuf::from("scene/crops/ours_crop_0.png"),
        }]
    );
}

#[test]
fn overlay_bounds_flip_against_image_height() {
    let crops = [[0, 0, 20, 10], [5, 30, 45, 70], [60, 100, 120, 150]];
    let crops_json = format!("{crops:?}");
    let doc = parse(&document_json(
        true,
        "",
        &[comparison_json("Zoom", &["s/a.png", "t/b.png"], &["A", "B"], &crops_json)],
    ));
    let images = FakeImages::new(160, 150);
    let out = generate(&doc, &images, &GenerateOptions::default()).expect("generation succeeds");
    let tex = out.tex.render();

    for [l, t, r, b] in crops {
        let expected = format!("({l},{}) rectangle ({r},{});", 150 - b, 150 - t);
        assert_eq!(tex.matches(&expected).count(), 2, "{expected} on both images");
    }

    // One size lookup for the first input only.
    assert_eq!(*images.sized.borrow(), vec![PathBuf::from("s/a.png")]);

    // Crops of every input land beside the first input.
    let cropped = images.cropped.borrow();
    assert_eq!(cropped.len(), 2);
    assert_eq!(cropped[1].0, PathBuf::from("t/b.png"));
    assert_eq!(cropped[1].1[2].dest, PathBuf::from("s/crops/b_crop_2.png"));
    assert!(tex.contains("{s/crops/b_crop_2.png}"));
}

#[test]
fn crop_outside_image_is_an_error() {
    let doc = parse(&document_json(
        true,
        "",
        &[comparison_json(
            "Zoom",
            &["s/a.png"],
            &["A"],
            "[[0, 0, 10, 10], [90, 90, 101, 100]]",
        )],
    ));
    let images = FakeImages::new(100, 100);
    let err = generate(&doc, &images, &GenerateOptions::default()).unwrap_err();

    match err {
        GenerateError::CropOutOfBounds {
            index,
            crop,
            width,
            height,
            ..
        } => assert_eq!((index, crop, width, height), (0, 1, 100, 100)),
        other => panic!("unexpected error: {other}"),
    }
    assert!(images.cropped.borrow().is_empty(), "nothing cropped on error");
}

#[test]
fn render_comparison_threads_the_counter() {
    let doc = parse(&document_json(
        true,
        "",
        &[comparison_json("A", &["a/1.png", "a/2.png"], &["1", "2"], "[]")],
    ));
    let images = FakeImages::new(10, 10);
    let (tex, next) = render_comparison(
        &doc.comparisons[0],
        ComparisonPosition::new(3, 5),
        40,
        &images,
        &GenerateOptions::default(),
    )
    .expect("render succeeds");

    assert_eq!(next, 42);
    let tex = tex.render();
    assert!(tex.contains("\\hypertarget{comparison:3}{}"));
    assert!(tex.contains("\\hypertarget{fig:40}{}"));
    assert!(tex.contains("\\hypertarget{fig:41}{}"));
    assert!(tex.contains("\\hyperlink{comparison:2}"));
    assert!(tex.contains("\\hyperlink{comparison:4}"));
}

fn unchecked_comparison(inputs: &[&str], labels: &[&str], crops: Vec<CropRect>) -> Comparison {
    Comparison {
        caption: "Unchecked".to_string(),
        inputs: inputs.iter().map(PathBuf::from).collect(),
        labels: labels.iter().map(|s| s.to_string()).collect(),
        fig_width_relative: 0.5,
        crops_height_in: 1.0,
        crops,
    }
}

#[test]
fn render_comparison_refuses_missing_labels() {
    let comparison = unchecked_comparison(&["a.png", "b.png"], &["A"], Vec::new());
    let err = render_comparison(
        &comparison,
        ComparisonPosition::new(2, 3),
        0,
        &FakeImages::new(10, 10),
        &GenerateOptions::default(),
    )
    .unwrap_err();

    assert!(
        matches!(
            err,
            GenerateError::Config(ConfigError::LabelCount {
                index: 2,
                labels: 1,
                inputs: 2
            })
        ),
        "{err}"
    );
}

#[test]
fn render_comparison_refuses_cropped_comparison_without_inputs() {
    let comparison = unchecked_comparison(&[], &[], vec![CropRect::new(0, 0, 5, 5)]);
    let images = FakeImages::new(10, 10);
    let err = render_comparison(
        &comparison,
        ComparisonPosition::new(0, 1),
        0,
        &images,
        &GenerateOptions::default(),
    )
    .unwrap_err();

    assert!(
        matches!(err, GenerateError::Config(ConfigError::NoInputs { index: 0 })),
        "{err}"
    );
    assert!(images.sized.borrow().is_empty());
}

#[test]
fn anonymous_documents_have_no_authors() {
    let doc = parse(&document_json(
        true,
        TWO_AUTHORS,
        &[comparison_json("A", &["a/1.png"], &["1"], "[]")],
    ));
    let out = render_all(&doc, &FakeImages::new(10, 10));
    let tex = out.tex.render();

    assert!(!out.authors_included);
    assert!(!tex.contains("\\author{"));
    assert!(!tex.contains("Ada Lovelace"));
    assert!(!tex.contains("Bletchley Park"));
}

#[test]
fn authors_are_listed_when_not_anonymous() {
    let doc = parse(&document_json(
        false,
        TWO_AUTHORS,
        &[comparison_json("A", &["a/1.png"], &["1"], "[]")],
    ));
    let out = render_all(&doc, &FakeImages::new(10, 10));
    let tex = out.tex.render();

    assert!(out.authors_included);
    assert!(tex.contains("\\author{Ada Lovelace$^{1, 2}$, Alan Turing$^{2}$\\\\"));
    assert!(tex.contains(
        "\\small{$^1$Analytical Engines Inc.\\hspace{1.5em} $^2$Bletchley Park}}"
    ));
    let author = tex.find("\\author{").expect("author block");
    let begin = tex.find("\\begin{document}").expect("begin");
    let title = tex.find("\\maketitle").expect("maketitle");
    assert!(begin < author && author < title);
}

#[test]
fn institution_mismatch_drops_the_whole_author_block() {
    let people = TWO_AUTHORS.replace(
        r#""Bletchley Park"]"#,
        r#""Bletchley Park", "Unreferenced Institute"]"#,
    );
    let doc = parse(&document_json(
        false,
        &people,
        &[comparison_json("A", &["a/1.png"], &["1"], "[]")],
    ));
    let out = render_all(&doc, &FakeImages::new(10, 10));
    let tex = out.tex.render();

    assert!(!out.authors_included);
    assert!(!tex.contains("\\author{"));
    assert!(!tex.contains("Ada Lovelace"));
    assert!(tex.contains("\\maketitle"));
    assert_eq!(out.figures, 1);
}

#[test]
fn preamble_and_closure() {
    let doc = parse(&document_json(
        true,
        "",
        &[comparison_json("A", &["a/1.png"], &["1"], "[]")],
    ));
    let out = render_all(&doc, &FakeImages::new(10, 10));
    let tex = out.tex.render();

    assert!(tex.starts_with(
        "% AUTO-GENERATED CODE, DO NOT MODIFY!!\n\\documentclass[10pt,letterpaper]{article}\n"
    ));
    for package in ["amsmath", "color", "epsfig", "hyperref", "tikz", "float", "subcaption"] {
        assert_eq!(tex.matches(&format!("\\usepackage{{{package}}}")).count(), 1);
    }
    assert!(tex.contains("\\definecolor{links_color}{RGB}{255,0,0}"));
    assert!(tex.contains("\\title{Seeing Clearly\\\\ ---Supplementary Material---}"));
    assert!(tex.contains("\\noindent Click a label to jump to that result.\n"));
    assert!(tex.ends_with("\\end{document}\n"));
    assert_eq!(tex.matches("\\begin{document}").count(), 1);
}

#[test]
fn image_service_errors_propagate() {
    struct Missing;
    impl ImageService for Missing {
        fn dimensions(&self, path: &Path) -> Result<(u32, u32), ImagingError> {
            Err(ImagingError::Open {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(std::io::ErrorKind::NotFound.into()),
            })
        }

        fn crop(&self, _source: &Path, _jobs: &[CropJob]) -> Result<(), ImagingError> {
            unreachable!("sizes are looked up before cropping")
        }
    }

    let doc = parse(&document_json(
        true,
        "",
        &[comparison_json("A", &["gone/1.png"], &["1"], "[[0, 0, 1, 1]]")],
    ));
    let err = generate(&doc, &Missing, &GenerateOptions::default()).unwrap_err();
    assert!(matches!(err, GenerateError::Imaging(ImagingError::Open { .. })));
    assert!(err.to_string().contains("gone/1.png"), "{err}");
}
