use disk_items::prelude::*;
use disk_items::Result;
use proptest::prelude::*;

const NAMES: &[&str] = &["a", "B", "b", "docs", "Docs", "notes.old", "bad name", "z"];

#[derive(Debug, Clone)]
enum Op {
    CreateDir { parent: usize, name: usize, writable: bool },
    CreateFile { parent: usize, name: usize, size: u64, writable: bool },
    CreateLink { parent: usize, name: usize, target: usize },
    Rename { item: usize, name: usize },
    Move { item: usize, target: usize },
    MakeRoot { item: usize },
    Resize { item: usize, delta: i64 },
    SetWritable { item: usize, writable: bool },
    Terminate { item: usize },
    DeleteRecursive { item: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let name = 0..NAMES.len();
    prop_oneof![
        (any::<usize>(), name.clone(), any::<bool>())
            .prop_map(|(parent, name, writable)| Op::CreateDir { parent, name, writable }),
        (any::<usize>(), name.clone(), 0u64..1000, any::<bool>()).prop_map(
            |(parent, name, size, writable)| Op::CreateFile { parent, name, size, writable }
        ),
        (any::<usize>(), name.clone(), any::<usize>())
            .prop_map(|(parent, name, target)| Op::CreateLink { parent, name, target }),
        (any::<usize>(), name).prop_map(|(item, name)| Op::Rename { item, name }),
        (any::<usize>(), any::<usize>()).prop_map(|(item, target)| Op::Move { item, target }),
        any::<usize>().prop_map(|item| Op::MakeRoot { item }),
        (any::<usize>(), -500i64..500).prop_map(|(item, delta)| Op::Resize { item, delta }),
        (any::<usize>(), any::<bool>())
            .prop_map(|(item, writable)| Op::SetWritable { item, writable }),
        any::<usize>().prop_map(|item| Op::Terminate { item }),
        any::<usize>().prop_map(|item| Op::DeleteRecursive { item }),
    ]
}

fn pick(fs: &FileSystem, index: usize) -> ItemId {
    ItemId::new(index % fs.len())
}

fn apply(fs: &mut FileSystem, op: &Op) -> Result<()> {
    match *op {
        Op::CreateDir { parent, name, writable } => {
            let parent = pick(fs, parent);
            fs.create_directory(Some(parent), NAMES[name], writable).map(|_| ())
        }
        Op::CreateFile { parent, name, size, writable } => {
            let parent = pick(fs, parent);
            fs.create_file(parent, NAMES[name], FileType::Text, size, writable)
                .map(|_| ())
        }
        Op::CreateLink { parent, name, target } => {
            let (parent, target) = (pick(fs, parent), pick(fs, target));
            fs.create_link(parent, NAMES[name], target).map(|_| ())
        }
        Op::Rename { item, name } => {
            let item = pick(fs, item);
            fs.rename(item, NAMES[name])
        }
        Op::Move { item, target } => {
            let (item, target) = (pick(fs, item), pick(fs, target));
            fs.move_to(item, target)
        }
        Op::MakeRoot { item } => {
            let item = pick(fs, item);
            fs.make_root(item)
        }
        Op::Resize { item, delta } => {
            let item = pick(fs, item);
            fs.resize(item, delta)
        }
        Op::SetWritable { item, writable } => {
            let item = pick(fs, item);
            fs.set_writable(item, writable)
        }
        Op::Terminate { item } => {
            let item = pick(fs, item);
            fs.terminate(item)
        }
        Op::DeleteRecursive { item } => {
            let item = pick(fs, item);
            fs.delete_recursive(item)
        }
    }
}

fn snapshot(fs: &FileSystem) -> Vec<Node> {
    fs.ids().filter_map(|id| fs.get(id).cloned()).collect()
}

fn seeded() -> FileSystem {
    let mut fs = FileSystem::with_options(FileSystemOptions::new().clock(ClockMode::Logical));
    let root = fs.create_root_directory("root").unwrap();
    fs.create_root_directory("other").unwrap();
    fs.create_directory(Some(root), "home", true).unwrap();
    fs
}

proptest! {
    /// Every operation sequence keeps the forest consistent
    #[test]
    fn random_operations_keep_invariants(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut fs = seeded();
        for op in &ops {
            let _ = apply(&mut fs, op);
            if let Err(err) = fs.check_invariants() {
                prop_assert!(false, "after {:?}: {}", op, err);
            }
        }
    }

    /// A failed operation leaves every item exactly as it was
    #[test]
    fn failed_operations_change_nothing(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut fs = seeded();
        for op in &ops {
            let before = snapshot(&fs);
            if apply(&mut fs, op).is_err() {
                prop_assert_eq!(&snapshot(&fs), &before, "failed {:?} changed the tree", op);
            }
        }
    }

    /// Terminated items stay terminated and detached
    #[test]
    fn termination_is_absorbing(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut fs = seeded();
        for op in &ops {
            let terminated: Vec<ItemId> = fs
                .ids()
                .filter(|&id| fs.is_terminated(id).unwrap_or(false))
                .collect();
            let _ = apply(&mut fs, op);
            for id in terminated {
                prop_assert!(fs.is_terminated(id).unwrap());
                prop_assert_eq!(fs.parent(id).unwrap(), None);
            }
        }
    }

    /// A successful recursive delete terminates the whole subtree
    #[test]
    fn recursive_delete_closes_subtree(
        ops in prop::collection::vec(op_strategy(), 1..40),
        victim in any::<usize>(),
    ) {
        let mut fs = seeded();
        for op in &ops {
            let _ = apply(&mut fs, op);
        }
        let victim = pick(&fs, victim);
        let subtree: Vec<ItemId> = fs.walk_from(victim, TraversalOrder::PreOrder).collect();
        if fs.delete_recursive(victim).is_ok() {
            for id in subtree {
                prop_assert!(fs.is_terminated(id).unwrap());
                prop_assert!(fs.is_root(id).unwrap());
                if fs.kind(id).unwrap() == ItemKind::Directory {
                    prop_assert_eq!(fs.child_count(id).unwrap(), 0);
                }
            }
        }
    }
}
