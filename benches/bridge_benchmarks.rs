use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsbridge::{Context, Value};

fn bench_eval(c: &mut Criterion) {
    let code = r#"
        var sum = 0;
        for (var i = 0; i < 1000; i = i + 1) {
            sum = sum + i;
        }
        sum
    "#;

    c.bench_function("eval loop 1k", |b| {
        let mut ctx = Context::new();
        b.iter(|| black_box(ctx.eval(code).unwrap()))
    });
}

fn bench_property_access(c: &mut Criterion) {
    let mut ctx = Context::new();
    let obj = ctx
        .eval("({ name: 'bench', items: [1, 2, 3, 4, 5], nested: { depth: { value: 42 } } })")
        .unwrap();

    c.bench_function("get member", |b| {
        b.iter(|| black_box(obj.get(&mut ctx, "name").unwrap()))
    });

    c.bench_function("get element", |b| {
        let items = obj.get(&mut ctx, "items").unwrap();
        b.iter(|| black_box(items.at(&mut ctx, 3).unwrap()))
    });

    c.bench_function("get path depth 3", |b| {
        b.iter(|| black_box(obj.get_path(&mut ctx, "nested.depth.value").unwrap()))
    });

    c.bench_function("set member", |b| {
        b.iter(|| obj.set(&mut ctx, "name", black_box(7)).unwrap())
    });
}

fn bench_call(c: &mut Criterion) {
    let mut ctx = Context::new();
    let add = ctx.eval("(function (a, b) { return a + b; })").unwrap();
    let args = [Value::from(20), Value::from(22)];

    c.bench_function("call script function", |b| {
        b.iter(|| black_box(add.call(&mut ctx, &args).unwrap()))
    });
}

fn bench_host_callback(c: &mut Criterion) {
    let mut ctx = Context::new();
    ctx.register_fn("lowercase", |_ctx, args| {
        Ok(args.first().and_then(Value::as_string).unwrap_or_default().to_lowercase())
    })
    .unwrap();

    let code = r#"
        var out;
        for (var i = 0; i < 100; i = i + 1) {
            out = lowercase('HeLLo WoRLD');
        }
        out
    "#;

    c.bench_function("host callback 100x", |b| {
        b.iter(|| black_box(ctx.eval(code).unwrap()))
    });
}

fn bench_context_create(c: &mut Criterion) {
    c.bench_function("context create", |b| b.iter(|| black_box(Context::new())));
}

criterion_group!(
    benches,
    bench_eval,
    bench_property_access,
    bench_call,
    bench_host_callback,
    bench_context_create,
);
criterion_main!(benches);
