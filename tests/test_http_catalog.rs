use mockito::{Matcher, Server};
use recipe_finder::{CatalogKind, OperationOutcome, Phase, RecipeFinder};

const TERIYAKI: &str = r#"{
    "meals": [{
        "idMeal": "52772",
        "strMeal": "Teriyaki Chicken Casserole",
        "strCategory": "Chicken",
        "strArea": "Japanese",
        "strTags": "Meat,Casserole",
        "strInstructions": "Preheat oven to 350&deg; F.",
        "strMealThumb": "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
        "strYoutube": "https://www.youtube.com/watch?v=4aZr5hZXP_s",
        "strIngredient1": "soy sauce",
        "strIngredient2": "water",
        "strIngredient3": "",
        "strMeasure1": "3/4 cup",
        "strMeasure2": "1/2 cup",
        "strMeasure3": " "
    }]
}"#;

const RICH_RESULTS: &str = r#"{
    "results": [{
        "id": 716429,
        "title": "Pasta with Garlic, Scallions, Cauliflower &amp; Breadcrumbs",
        "image": "https://img.spoonacular.com/recipes/716429-556x370.jpg",
        "readyInMinutes": 45,
        "servings": 2,
        "dishTypes": ["lunch", "main course", "dinner"],
        "aggregateLikes": 209,
        "summary": "<b>Easy</b> weeknight pasta.",
        "extendedIngredients": [
            {"name": "butter", "amount": 1.0, "unit": "tbsp"},
            {"name": "cauliflower florets", "amount": 2.5, "unit": "cups"}
        ]
    }]
}"#;

fn mealdb_finder(server: &Server) -> RecipeFinder {
    RecipeFinder::builder()
        .catalog_kind(CatalogKind::MealDb)
        .base_url(server.url())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_mealdb_search_populates_list() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search.php")
        .match_query(Matcher::UrlEncoded("s".into(), "chicken".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TERIYAKI)
        .create_async()
        .await;

    let finder = mealdb_finder(&server);
    assert_eq!(finder.search("chicken").await, OperationOutcome::Applied);

    let snapshot = finder.snapshot();
    assert_eq!(snapshot.list.phase, Phase::Success);
    let recipe = &snapshot.list.recipes[0];
    assert_eq!(recipe.id, "52772");
    assert_eq!(recipe.title, "Teriyaki Chicken Casserole");
    assert_eq!(recipe.tags, vec!["Chicken", "Japanese", "Meat", "Casserole"]);
    assert_eq!(recipe.ingredients.len(), 2);
    assert_eq!(recipe.ingredients[0].to_string(), "3/4 cup soy sauce");
    assert_eq!(recipe.instructions.as_deref(), Some("Preheat oven to 350° F."));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_mealdb_random_batch_issues_one_request_per_recipe() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/random.php")
        .with_status(200)
        .with_body(TERIYAKI)
        .expect(4)
        .create_async()
        .await;

    let finder = mealdb_finder(&server);
    assert_eq!(finder.fetch_random_batch(4).await, OperationOutcome::Applied);

    let snapshot = finder.snapshot();
    assert_eq!(snapshot.list.phase, Phase::Success);
    // Random batches may legitimately repeat a recipe
    assert_eq!(snapshot.list.recipes.len(), 4);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_mealdb_server_error_keeps_list_empty() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/search.php")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let finder = mealdb_finder(&server);
    finder.search("chicken").await;

    let snapshot = finder.snapshot();
    assert_eq!(snapshot.list.phase, Phase::Error);
    assert!(snapshot.list.error.unwrap().contains("503"));
    assert!(snapshot.list.recipes.is_empty());
}

#[tokio::test]
async fn test_mealdb_details_for_unknown_id() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::UrlEncoded("i".into(), "1".into()))
        .with_status(200)
        .with_body(r#"{"meals": null}"#)
        .create_async()
        .await;

    let finder = mealdb_finder(&server);
    finder.fetch_details("1").await;

    let snapshot = finder.snapshot();
    assert_eq!(snapshot.detail.phase, Phase::Error);
    assert!(snapshot.detail.error.unwrap().contains("No recipe found with id 1"));
}

#[tokio::test]
async fn test_spoonacular_search_normalizes_rich_records() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
            Matcher::UrlEncoded("query".into(), "pasta".into()),
            Matcher::UrlEncoded("number".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(RICH_RESULTS)
        .create_async()
        .await;

    let finder = RecipeFinder::builder()
        .catalog_kind(CatalogKind::Spoonacular)
        .api_key("test-key")
        .base_url(server.url())
        .search_limit(5)
        .build()
        .unwrap();
    finder.search("pasta").await;

    let snapshot = finder.snapshot();
    assert_eq!(snapshot.list.phase, Phase::Success);
    let recipe = &snapshot.list.recipes[0];
    assert_eq!(recipe.id, "716429");
    assert_eq!(
        recipe.title,
        "Pasta with Garlic, Scallions, Cauliflower & Breadcrumbs"
    );
    assert_eq!(recipe.ready_in_minutes, Some(45));
    assert_eq!(recipe.servings, Some(2));
    assert_eq!(recipe.tags, vec!["lunch", "main course"]);
    assert_eq!(recipe.likes, Some(209));
    assert_eq!(recipe.ingredients[0].to_string(), "1 tbsp butter");
    assert_eq!(recipe.ingredients[1].to_string(), "2.5 cups cauliflower florets");
    assert_eq!(recipe.summary_text().as_deref(), Some("Easy weeknight pasta."));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_spoonacular_details_request_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/716429/information")
        .match_query(Matcher::UrlEncoded("apiKey".into(), "test-key".into()))
        .with_status(200)
        .with_body(r#"{"id": 716429, "title": "Cauliflower Pasta"}"#)
        .create_async()
        .await;

    let finder = RecipeFinder::builder()
        .catalog_kind(CatalogKind::Spoonacular)
        .api_key("test-key")
        .base_url(server.url())
        .build()
        .unwrap();
    assert_eq!(finder.fetch_details("716429").await, OperationOutcome::Applied);

    let selected = finder.snapshot().detail.selected.unwrap();
    assert_eq!(selected.title, "Cauliflower Pasta");
    assert_eq!(selected.image_or_placeholder(), "/api/placeholder/400/320");
    mock.assert_async().await;
}
