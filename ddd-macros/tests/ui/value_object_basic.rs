use ddd_macros::value_object;

#[value_object]
struct Amount {
    value: i64,
}

#[value_object(debug = false)]
struct NonDebugVO(i32);

#[value_object(default = false)]
struct Code(String);

#[value_object(copy = true)]
enum Level {
    #[default]
    Low,
    High,
}

fn main() {
    // Debug 默认开启，应可格式化
    let _ = format!("{:?}", Amount { value: 0 });

    let a = Amount::default();
    let _b = a.clone();
    let _eq = a == Amount { value: 0 };

    let _ = NonDebugVO(1);
    let _ = Code("x".to_string()).clone();

    // copy = true：Copy + Hash
    let lv: Level = Default::default();
    let copied = lv;
    let mut set = std::collections::HashSet::new();
    set.insert(lv);
    set.insert(copied);
    let _ = Level::High;
}
