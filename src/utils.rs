use crate::value::Entries;

pub fn print_entries(entries: &Entries, verbose: bool) {
    for (name, value) in entries {
        if verbose {
            println!("{} = {:?}", name, value)
        } else {
            println!("{} = {}", name, value)
        }
    }
}
