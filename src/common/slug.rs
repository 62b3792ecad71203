// src/common/slug.rs

/// Gera o identificador público de uma empresa a partir do nome.
///
/// Acentos do português são reduzidos à letra base; qualquer outro caractere
/// que não seja alfanumérico vira um único hífen.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_dash = false;

    for c in name.chars().flat_map(|c| c.to_lowercase()) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_dash = false;
        } else if !prev_dash && !out.is_empty() {
            out.push('-');
            prev_dash = true;
        }
    }

    out.trim_matches('-').to_string()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(slugify("Acme Industrial"), "acme-industrial");
    }

    #[test]
    fn folds_portuguese_accents() {
        assert_eq!(slugify("Construção São João"), "construcao-sao-joao");
    }

    #[test]
    fn collapses_symbols_and_trims() {
        assert_eq!(slugify("  ACME & Filhos, Ltda.  "), "acme-filhos-ltda");
    }

    #[test]
    fn names_differing_only_in_punctuation_collide() {
        assert_eq!(slugify("Acme"), slugify("ACME!"));
    }
}
