use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gelbooru_downloader::extractor::parse_post_page;
use gelbooru_downloader::text::extract_iter;
use rand::{thread_rng, Rng};

static TEST_POST_PAGE: &str = include_str!("../assets/sample_pages/post_page.html");

/// A search listing with `num` random post ids, plus the paginator anchor.
fn seed_listing(num: usize) -> String {
    let mut rng = thread_rng();

    let thumbs: String = (0..num)
        .map(|_| {
            let id: u32 = rng.gen_range(1..12_000_000);
            format!(
                "<span class=\"thumb\"><a id=\"p{id}\" href=\"index.php?page=post&amp;s=view&amp;id={id}\"><img src=\"thumbnail_{id}.jpg\" /></a></span>\n"
            )
        })
        .collect();

    format!("<html><body><div class=\"content\">\n{thumbs}</div>\n<div id=\"paginator\"></div></body></html>")
}

fn post_page(c: &mut Criterion) {
    c.bench_function("Parse Gelbooru post page", |b| {
        b.iter(|| black_box(parse_post_page(black_box(TEST_POST_PAGE))))
    });

    let listing = seed_listing(42);
    c.bench_function("Collect ids from a 42 post listing", |b| {
        b.iter(|| {
            black_box(
                extract_iter(black_box(&listing), "<a id=\"p", "\"")
                    .filter(|id| id.bytes().all(|c| c.is_ascii_digit()))
                    .count(),
            )
        })
    });
}

criterion_group!(benches, post_page);
criterion_main!(benches);
