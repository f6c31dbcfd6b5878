//! Built-in demo catalog: four sellers around Dakar, Thiès and Tivaouane.

use super::catalog::{Catalog, CatalogError};
use super::location::Location;
use super::product::{Product, ProductCategory};
use super::seller::Seller;

pub fn sample_sellers() -> Vec<Seller> {
    let dakar = Location::with_city(14.7167, -17.4677, "Dakar");
    let thies = Location::with_city(14.7833, -16.9333, "Thiès");
    let tivaouane = Location::with_city(14.9500, -16.8167, "Tivaouane");

    vec![
        Seller::new("seller1", "Boutique Mode Dakar", dakar.clone(), "+221 77 123 4567")
            .with_rating(4.6, 128)
            .verified(),
        Seller::new("seller2", "Beauté & Co", dakar, "+221 77 234 5678").with_rating(4.2, 64),
        Seller::new("seller3", "Tech Store Thiès", thies, "+221 77 345 6789")
            .with_rating(4.8, 210)
            .verified(),
        Seller::new("seller4", "Fashion House Tivaouane", tivaouane, "+221 77 456 7890")
            .with_rating(3.9, 17),
    ]
}

pub fn sample_products() -> Vec<Product> {
    use ProductCategory::*;

    vec![
        Product::new(
            "prod1",
            "Robe Rouge Élégante",
            "Robe rouge élégante parfaite pour les occasions spéciales",
            25000.0,
            5,
            "seller1",
            Fashion,
        )
        .with_tags(["robe", "rouge", "élégant", "occasion"]),
        Product::new(
            "prod2",
            "Écouteurs Sans Fil",
            "Écouteurs bluetooth haute qualité avec réduction de bruit",
            45000.0,
            12,
            "seller3",
            Tech,
        )
        .with_tags(["écouteurs", "bluetooth", "sans fil", "audio"]),
        Product::new(
            "prod3",
            "Crème Hydratante Naturelle",
            "Crème hydratante 100% naturelle pour tous types de peau",
            8000.0,
            20,
            "seller2",
            Beauty,
        )
        .with_tags(["crème", "hydratante", "naturelle", "peau"]),
        Product::new(
            "prod4",
            "Sac à Main Tendance",
            "Sac à main moderne et spacieux, parfait pour le quotidien",
            35000.0,
            8,
            "seller1",
            Fashion,
        )
        .with_tags(["sac", "main", "tendance", "quotidien"]),
        Product::new(
            "prod5",
            "Smartphone Android",
            "Smartphone dernière génération avec appareil photo haute résolution",
            180000.0,
            3,
            "seller3",
            Tech,
        )
        .with_tags(["smartphone", "android", "photo", "technologie"]),
        Product::new(
            "prod6",
            "Parfum Exclusif",
            "Parfum exclusif avec des notes florales et boisées",
            55000.0,
            15,
            "seller2",
            Beauty,
        )
        .with_tags(["parfum", "exclusif", "floral", "boisé"]),
        Product::new(
            "prod7",
            "Décoration Murale",
            "Décoration murale africaine traditionnelle",
            15000.0,
            10,
            "seller4",
            Home,
        )
        .with_tags(["décoration", "murale", "africain", "traditionnel"]),
        Product::new(
            "prod8",
            "T-shirt Basique",
            "T-shirt en coton bio, confortable et durable",
            12000.0,
            25,
            "seller1",
            Fashion,
        )
        .with_tags(["t-shirt", "coton", "bio", "basique"]),
    ]
}

pub fn sample_catalog() -> Result<Catalog, CatalogError> {
    Catalog::new(sample_sellers(), sample_products())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_valid() {
        let catalog = sample_catalog().unwrap();
        assert_eq!(catalog.sellers().len(), 4);
        assert_eq!(catalog.products().len(), 8);
    }
}
