//! Built-in sample catalogs for `procchain demo`.

pub const BREAD_RULES: &[&str] = &["gather:field:wheat", "bake:flour:bread", "mill:wheat:flour"];

/// 1..=10 with +1 / -1 steps and multiply-by-2 shortcuts out of `2`.
pub const ARITHMETIC_RULES: &[&str] = &[
    "add1+1=2:1:2",
    "add2+1=3:2:3",
    "add3+1=4:3:4",
    "add4+1=5:4:5",
    "add5+1=6:5:6",
    "add6+1=7:6:7",
    "add7+1=8:7:8",
    "add8+1=9:8:9",
    "add9+1=10:9:10",
    "sub2-1=1:2:1",
    "sub3-1=2:3:2",
    "sub4-1=3:4:3",
    "sub5-1=4:5:4",
    "sub6-1=5:6:5",
    "sub7-1=6:7:6",
    "sub8-1=7:8:7",
    "sub9-1=8:9:8",
    "mul2*2=4:2:4",
    "mul2*3=6:2:6",
    "mul2*4=8:2:8",
    "mul2*5=10:2:10",
];

#[derive(Debug, Clone, Copy)]
pub struct DemoCase {
    pub title: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub rules: &'static [&'static str],
}

pub fn cases() -> Vec<DemoCase> {
    vec![
        DemoCase {
            title: "bread",
            start: "field",
            end: "bread",
            rules: BREAD_RULES,
        },
        DemoCase {
            title: "no route to a ferrari",
            start: "field",
            end: "ferrari",
            rules: BREAD_RULES,
        },
        DemoCase {
            title: "already there",
            start: "field",
            end: "field",
            rules: BREAD_RULES,
        },
        DemoCase {
            title: "arithmetic shortcut",
            start: "1",
            end: "10",
            rules: ARITHMETIC_RULES,
        },
    ]
}
