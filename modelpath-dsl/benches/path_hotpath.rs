use criterion::{black_box, criterion_group, criterion_main, Criterion};
use modelpath_dsl::{parse_path, tokenize};

const PATH_SIMPLE: &str = "identity.attributes.department";
const PATH_FILTERS: &str = r#"links[AD].attributes{memberOf*="CN=Admins"}.entitlements[type=group]"#;

fn bench_lex(c: &mut Criterion) {
    c.bench_function("path/lex_filters", |b| {
        b.iter(|| {
            let tokens = tokenize(black_box(PATH_FILTERS)).expect("lex path");
            black_box(tokens.len());
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("path/parse_simple", |b| {
        b.iter(|| {
            let path = parse_path(black_box(PATH_SIMPLE)).expect("parse path");
            black_box(path.len());
        });
    });

    c.bench_function("path/parse_filters", |b| {
        b.iter(|| {
            let path = parse_path(black_box(PATH_FILTERS)).expect("parse path");
            black_box(path.len());
        });
    });
}

criterion_group!(benches, bench_lex, bench_parse);
criterion_main!(benches);
