//! Line diff between two serialized documents, used for `--output-diff`

/// Largest LCS table (old lines × new lines of the changed middle) built
/// before falling back to a whole-block replacement.
const MAX_TABLE_CELLS: usize = 4_000_000;

/// Diff two texts line by line.
///
/// Unchanged lines are prefixed with two spaces, removed lines with `- ` and
/// added lines with `+ `. The common head and tail are matched directly; the
/// changed middle is aligned by longest common subsequence, so reordered
/// blocks show up as remove/add pairs. A middle too large for the table is
/// shown as all of its old lines removed, then all of its new lines added.
pub fn compute_document_diff(before: &str, after: &str) -> String {
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut output = String::new();
    for line in &old[..prefix] {
        push_line(&mut output, ' ', line);
    }
    if old_mid.len().saturating_mul(new_mid.len()) > MAX_TABLE_CELLS {
        for line in old_mid {
            push_line(&mut output, '-', line);
        }
        for line in new_mid {
            push_line(&mut output, '+', line);
        }
    } else {
        diff_lcs(old_mid, new_mid, &mut output);
    }
    for line in &old[old.len() - suffix..] {
        push_line(&mut output, ' ', line);
    }

    output
}

fn diff_lcs(old: &[&str], new: &[&str], output: &mut String) {
    // lcs[i * width + j] = length of the common subsequence of old[i..] and new[j..]
    let width = new.len() + 1;
    let mut lcs = vec![0usize; (old.len() + 1) * width];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            lcs[i * width + j] = if old[i] == new[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            push_line(output, ' ', old[i]);
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            push_line(output, '-', old[i]);
            i += 1;
        } else {
            push_line(output, '+', new[j]);
            j += 1;
        }
    }
    for line in &old[i..] {
        push_line(output, '-', line);
    }
    for line in &new[j..] {
        push_line(output, '+', line);
    }
}

fn push_line(output: &mut String, marker: char, line: &str) {
    output.push(marker);
    output.push(' ');
    output.push_str(line);
    output.push('\n');
}

/// True when the diff output contains any added or removed line
pub fn has_changes(diff: &str) -> bool {
    diff.lines().any(|l| l.starts_with("+ ") || l.starts_with("- "))
}
