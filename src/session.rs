// Interactive shopping list session
//
// Commands, one per line:
//   a  add     (then item name, then quantity)
//   r  remove  (then item name, then quantity)
//   s  show
//   q  quit

use crate::ledger::ShoppingList;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

const PROMPT: &str = "Command (a=add, r=remove, s=show, q=quit): ";

/// Read one trimmed line; `None` at end of input
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask for an item name and a quantity. `None` means input ended.
fn read_item<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<(String, Result<i64, String>)>> {
    write!(output, "Item name: ")?;
    output.flush()?;
    let Some(name) = read_line(input)? else {
        return Ok(None);
    };

    write!(output, "Quantity: ")?;
    output.flush()?;
    let Some(raw) = read_line(input)? else {
        return Ok(None);
    };

    let quantity = raw.parse::<i64>().map_err(|_| raw);
    Ok(Some((name, quantity)))
}

fn show<W: Write>(list: &ShoppingList, output: &mut W) -> Result<()> {
    if list.is_empty() {
        writeln!(output, "(empty)")?;
    }
    for (name, qty) in list.sorted_items() {
        writeln!(output, "{}: {}", name, qty)?;
    }
    Ok(())
}

/// Drive `list` from line-based commands until `q` or end of input
pub fn run_shopping_session<R: BufRead, W: Write>(
    list: &mut ShoppingList,
    mut input: R,
    mut output: W,
) -> Result<()> {
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(command) = read_line(&mut input)? else {
            writeln!(output)?;
            return Ok(());
        };

        match command.as_str() {
            "a" | "r" => {
                let Some((name, quantity)) = read_item(&mut input, &mut output)? else {
                    writeln!(output)?;
                    return Ok(());
                };

                let quantity = match quantity {
                    Ok(q) => q,
                    Err(raw) => {
                        writeln!(output, "Invalid quantity: {:?}", raw)?;
                        continue;
                    }
                };

                if command == "a" {
                    list.add_item(name.as_str(), quantity);
                    writeln!(output, "Added {} x {}", quantity, name)?;
                } else {
                    match list.remove_item(&name, quantity) {
                        Some(left) => writeln!(output, "{} left: {}", name, left)?,
                        None => writeln!(output, "{} is no longer on the list", name)?,
                    }
                }
            }
            "s" => show(list, &mut output)?,
            "q" => return Ok(()),
            "" => {}
            other => writeln!(output, "Unknown command {:?}", other)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> (ShoppingList, String) {
        let mut list = ShoppingList::new();
        let mut out = Vec::new();
        run_shopping_session(&mut list, Cursor::new(script), &mut out).unwrap();
        (list, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_add_remove_show() {
        let (list, out) = run("a\nApples\n3\na\nMilk\n1\nr\nApples\n2\ns\nq\n");

        assert_eq!(list.quantity("Apples"), Some(1));
        assert_eq!(list.quantity("Milk"), Some(1));
        assert!(out.contains("Apples left: 1"));
        assert!(out.contains("Apples: 1\nMilk: 1\n"));
    }

    #[test]
    fn test_remove_to_zero() {
        let (list, out) = run("a\nBread\n1\nr\nBread\n1\ns\nq\n");

        assert!(list.is_empty());
        assert!(out.contains("Bread is no longer on the list"));
        assert!(out.contains("(empty)"));
    }

    #[test]
    fn test_invalid_quantity_keeps_going() {
        let (list, out) = run("a\nEggs\ntwelve\na\nEggs\n12\nq\n");

        assert!(out.contains("Invalid quantity: \"twelve\""));
        assert_eq!(list.quantity("Eggs"), Some(12));
    }

    #[test]
    fn test_unknown_command_and_eof() {
        let (list, out) = run("x\na\nTea\n");

        assert!(out.contains("Unknown command \"x\""));
        assert!(list.is_empty());
    }
}
