use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sectree::{BranchState, SectionTree, TreeElement, build, root_sections};

#[derive(Clone)]
struct BenchElement {
    id: u32,
    parent: Option<u32>,
}

impl TreeElement for BenchElement {
    type Id = u32;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn parent_id(&self) -> Option<&u32> {
        self.parent.as_ref()
    }

    fn rank(&self) -> i64 {
        i64::from(self.id)
    }

    fn initial_state(&self) -> BranchState {
        BranchState::Expanded
    }

    fn root_element() -> Self {
        Self {
            id: u32::MAX,
            parent: None,
        }
    }
}

/// Balanced tree with `fanout` children per branch, `depth` levels deep.
fn balanced(fanout: u32, depth: u32) -> Vec<BenchElement> {
    let mut elements = vec![BenchElement { id: 0, parent: None }];
    let mut level = vec![0];
    let mut next_id = 1;
    for _ in 0..depth {
        let mut children = Vec::new();
        for parent in level {
            for _ in 0..fanout {
                elements.push(BenchElement {
                    id: next_id,
                    parent: Some(parent),
                });
                children.push(next_id);
                next_id += 1;
            }
        }
        level = children;
    }
    elements
}

fn bench_flatten(c: &mut Criterion) {
    let root = build(balanced(6, 5)).expect("bench tree builds");

    c.bench_function("flatten_balanced_6x5", |b| {
        b.iter(|| {
            let sections = root_sections(black_box(&root), true);
            black_box(sections.len());
        });
    });
}

fn bench_toggle(c: &mut Criterion) {
    let mut tree = SectionTree::new(balanced(6, 5)).expect("bench tree builds");

    c.bench_function("toggle_top_level_pair", |b| {
        b.iter(|| {
            let collapsed = tree.toggle(1).expect("collapse");
            let expanded = tree.toggle(1).expect("expand");
            black_box((collapsed, expanded));
        });
    });
}

criterion_group!(sections, bench_flatten, bench_toggle);
criterion_main!(sections);
