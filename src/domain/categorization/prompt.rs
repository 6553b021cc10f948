//! Categorization prompt

use std::fmt::Write;

use super::entity::CATEGORY_TAXONOMY;

/// Build the instruction sent to the model for `names`
///
/// Lists the taxonomy, embeds the names in order and asks for a bare JSON
/// object of the form `{"categorizedProducts": [{"name", "category"}]}`.
pub fn build_categorization_prompt<S: AsRef<str>>(names: &[S]) -> String {
    let joined = names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = String::from(
        "Vas a prestar atención a los nombres de los productos y categorízalos en las siguientes categorías principales:\n",
    );
    for category in CATEGORY_TAXONOMY {
        let _ = writeln!(prompt, "- {}", category);
    }

    let _ = write!(
        prompt,
        "\nProductos: {joined}\n\n\
         Si el producto tiene un nombre que no se ajusta a ninguna categoría, crea una nueva categoría para ese producto. \
         Por ejemplo, si el producto es \"Coca Cola o Coca\", lo categorizas como \"Bebidas\". \
         Si es \"Yerba\" lo categorizas como \"Despensa\".\n\n\
         Responde ÚNICAMENTE con un objeto JSON válido en el siguiente formato, sin texto adicional:\n\
         {{\n  \"categorizedProducts\": [\n    {{\n      \"name\": \"nombre_del_producto\",\n      \"category\": \"categoría_asignada\"\n    }}\n  ]\n}}\n"
    );

    prompt
}
