//! diagnostics: human readable component paths for error messages

use crate::component::{ComponentId, ComponentTable, ROOT};

/// `main->gate[1]`-style path from the root down to `id`
///
/// ancestors are still live whenever one of their descendants runs, so the
/// walk only stops short if the table is queried for a released component.
pub fn format_ancestor_trace(table: &ComponentTable, id: ComponentId) -> String {
    let mut names = Vec::new();
    let mut current = id;
    loop {
        match table.name_and_father(current) {
            Ok((name, father)) => {
                names.push(name);
                if current == ROOT {
                    break;
                }
                current = father;
            }
            Err(_) => {
                names.push(format!("<released {}>", current));
                break;
            }
        }
    }
    names.reverse();
    names.join("->")
}

/// `[i][j]...` suffix naming element `index` of a component array with the
/// given dimensions (row-major)
pub fn position_suffix(dimensions: &[usize], index: usize) -> String {
    let mut positions = Vec::with_capacity(dimensions.len());
    let mut rest = index;
    for &dim in dimensions.iter().rev() {
        if dim == 0 {
            positions.push(0);
            continue;
        }
        positions.push(rest % dim);
        rest /= dim;
    }
    positions
        .iter()
        .rev()
        .map(|p| format!("[{}]", p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::TemplateInfo;

    const T: TemplateInfo = TemplateInfo {
        id: 0,
        name: "T",
        input_arity: 1,
        subcomponents: 1,
    };

    #[test]
    fn test_position_suffix() {
        assert_eq!(position_suffix(&[2], 1), "[1]");
        assert_eq!(position_suffix(&[2, 3], 4), "[1][1]");
        assert_eq!(position_suffix(&[2, 3], 5), "[1][2]");
        assert_eq!(position_suffix(&[], 0), "");
    }

    #[test]
    fn test_ancestor_trace() {
        let table = ComponentTable::new(3);
        let root = table.allocate(0, T, 0, "main".into()).unwrap();
        let mid = table.allocate(root, T, 1, "inner".into()).unwrap();
        let leaf = table.allocate(mid, T, 2, "gate[0]".into()).unwrap();
        assert_eq!(format_ancestor_trace(&table, root), "main");
        assert_eq!(format_ancestor_trace(&table, leaf), "main->inner->gate[0]");
    }

    #[test]
    fn test_trace_of_missing_component() {
        let table = ComponentTable::new(1);
        assert_eq!(format_ancestor_trace(&table, 0), "<released 0>");
    }
}
