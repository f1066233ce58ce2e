use skipmap::SkipMap;

fn main() {
  let mut list = SkipMap::new();

  let words = [
    "foxtrot", "alpha", "zulu", "ant", "bravo", "zoo", "aardvark", "computer", "science", "skip",
    "list", "binary", "search", "tree",
  ];

  let mut out = String::new();

  for word in words {
    println!("Adding {word}");
    list.insert(word, word);
    out.clear();
    list.dump(&mut out).unwrap();
    println!("{out}");
  }

  for word in words {
    println!("Removing {word}");
    list.remove(&word);
    out.clear();
    list.dump(&mut out).unwrap();
    println!("{out}");
  }
}
